//! Role gate for route groups restricted to specific roles.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use gatehouse_auth::TokenCodec;
use gatehouse_entity::Role;

use super::auth::authenticate;
use crate::error::AuthRejection;

/// Middleware state: the codec plus the roles a route group admits.
#[derive(Debug, Clone)]
pub struct RoleGate {
    codec: Arc<TokenCodec>,
    allowed: Arc<[Role]>,
}

impl RoleGate {
    /// Creates a gate admitting exactly the listed roles.
    pub fn new(codec: Arc<TokenCodec>, allowed: impl Into<Arc<[Role]>>) -> Self {
        Self {
            codec,
            allowed: allowed.into(),
        }
    }

    /// Whether `role` is on the allow-list.
    pub fn permits(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// Authenticates like `auth_only`, then requires an allowed role.
pub async fn check_role(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let ctx = authenticate(&gate.codec, request.headers())?;

    if !gate.permits(ctx.role) {
        warn!(
            principal_id = %ctx.principal_id,
            role = %ctx.role,
            path = %request.uri().path(),
            "Role not permitted"
        );
        return Err(AuthRejection::Forbidden);
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
