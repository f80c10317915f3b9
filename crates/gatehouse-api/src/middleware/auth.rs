//! Bearer-token gates.
//!
//! `auth_only` admits only live, authentic access tokens. `parse_auth_token`
//! guards the token rotation endpoint and also admits expired ones, since
//! rotating after expiry is that endpoint's purpose; the session manager
//! decides whether the refresh secret is still good.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tracing::debug;

use gatehouse_auth::TokenCodec;

use crate::error::AuthRejection;
use crate::extractors::AuthContext;

const BEARER: &str = "Bearer";

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// The value must split on single spaces into exactly two parts, the first
/// being literally `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthRejection::InvalidAuthHeader)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthRejection::InvalidAuthHeader),
    }
}

/// Verifies the bearer token and rechecks expiry against the wall clock.
pub(crate) fn authenticate(
    codec: &TokenCodec,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthRejection> {
    let token = bearer_token(headers)?;

    let claims = codec.verify_access_token(token).map_err(|e| {
        debug!(reason = %e, "Access token rejected");
        AuthRejection::from(e)
    })?;

    if claims.is_expired_at(Utc::now(), codec.leeway()) {
        return Err(AuthRejection::TokenExpired);
    }

    Ok(AuthContext {
        principal_id: claims.sub,
        role: claims.role,
        access_expired: false,
    })
}

/// Admits requests carrying a live access token.
pub async fn auth_only(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let ctx = authenticate(&codec, request.headers())?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Admits requests carrying an authentic access token, expired or not.
pub async fn parse_auth_token(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = bearer_token(request.headers())?;

    let claims = codec.decode_ignoring_expiry(token).map_err(|e| {
        debug!(reason = %e, "Rotation request carried an unusable access token");
        AuthRejection::InvalidAuthHeader
    })?;

    let ctx = AuthContext {
        principal_id: claims.sub,
        role: claims.role,
        access_expired: claims.is_expired_at(Utc::now(), codec.leeway()),
    };
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
