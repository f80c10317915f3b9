//! `AuthContext` extractor: the principal a request gate admitted.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;

use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Role;

use crate::error::AuthRejection;

/// Principal and role attached to the request by a gate.
///
/// Handlers behind a gate take this as an argument. Extracting it on a
/// route no gate ran on yields `401 INVALID_AUTH_HEADER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    /// Authenticated principal.
    pub principal_id: PrincipalId,
    /// Role carried by the access token.
    pub role: Role,
    /// Set only by the rotation gate, which admits expired access tokens.
    pub access_expired: bool,
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthRejection::InvalidAuthHeader)
    }
}
