//! Auth handlers: token rotation and identity echo.

use axum::Json;
use axum::extract::{Query, State};
use tracing::info;

use crate::dto::request::UpdateTokensQuery;
use crate::dto::response::TokensResponse;
use crate::error::ApiError;
use crate::extractors::AuthContext;
use crate::state::AppState;

/// GET /api/v1/update-tokens?refresh_token=...
pub async fn update_tokens(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<UpdateTokensQuery>,
) -> Result<Json<TokensResponse>, ApiError> {
    let pair = state
        .session_manager
        .update(auth.principal_id, auth.role, &query.refresh_token)
        .await?;

    info!(
        principal_id = %auth.principal_id,
        access_expired = auth.access_expired,
        "Tokens updated"
    );
    Ok(Json(pair.into()))
}

/// GET /api/v1/whoami
pub async fn whoami(auth: AuthContext) -> Json<AuthContext> {
    Json(auth)
}
