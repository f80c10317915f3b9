//! Route definitions for the Gatehouse HTTP API.

use std::time::Duration;

use axum::http::StatusCode;
use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use gatehouse_entity::Role;

use crate::handlers;
use crate::middleware;
use crate::middleware::rbac::RoleGate;
use crate::state::AppState;

/// Build the complete router with all routes, gates and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(rotation_routes(&state))
        .merge(authenticated_routes(&state))
        .merge(moderation_routes(&state));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Token rotation; admits expired access tokens.
fn rotation_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/update-tokens", get(handlers::auth::update_tokens))
        .route_layer(axum_middleware::from_fn_with_state(
            state.codec.clone(),
            middleware::auth::parse_auth_token,
        ))
}

/// Routes open to any principal with a live access token.
fn authenticated_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/whoami", get(handlers::auth::whoami))
        .route_layer(axum_middleware::from_fn_with_state(
            state.codec.clone(),
            middleware::auth::auth_only,
        ))
}

/// Moderator-only routes.
fn moderation_routes(state: &AppState) -> Router<AppState> {
    let gate = RoleGate::new(state.codec.clone(), [Role::Moderator]);

    Router::new()
        .route("/moderation/whoami", get(handlers::auth::whoami))
        .route_layer(axum_middleware::from_fn_with_state(
            gate,
            middleware::rbac::check_role,
        ))
}
