//! Integration tests for the request gates.

mod helpers;

use axum::http::StatusCode;

use gatehouse_entity::Role;

#[tokio::test]
async fn test_whoami_with_valid_token() {
    let app = helpers::TestApp::new();
    let (principal, pair) = app.register(Role::Client).await;

    let response = app.get_bearer("/api/v1/whoami", &pair.access_token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.str_field("principal_id"), principal.to_string());
    assert_eq!(response.str_field("role"), "client");
    assert_eq!(response.body["access_expired"], false);
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let app = helpers::TestApp::new();

    let response = app.get("/api/v1/whoami", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_AUTH_HEADER");
}

#[tokio::test]
async fn test_malformed_header_is_unauthorized() {
    let app = helpers::TestApp::new();
    let (_, pair) = app.register(Role::Client).await;

    for value in [
        "malformed-token".to_string(),
        format!("Token {}", pair.access_token),
        format!("Bearer {} extra", pair.access_token),
    ] {
        let response = app.get("/api/v1/whoami", Some(&value)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{value}");
        assert_eq!(response.error_code(), "INVALID_AUTH_HEADER");
    }
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = helpers::TestApp::new();

    let response = app.get_bearer("/api/v1/whoami", "not.a.jwt").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_foreign_signature_is_invalid() {
    let app = helpers::TestApp::new();
    let token = app.foreign_access_token(gatehouse_core::types::PrincipalId::new(), Role::Moderator);

    let response = app.get_bearer("/api/v1/whoami", &token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token_is_rejected_with_distinct_code() {
    let app = helpers::TestApp::new();
    let (principal, _) = app.register(Role::Client).await;
    let token = app.expired_access_token(principal, Role::Client);

    let response = app.get_bearer("/api/v1/whoami", &token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_client_on_moderator_route_is_forbidden() {
    let app = helpers::TestApp::new();
    let (_, pair) = app.register(Role::Client).await;

    let response = app
        .get_bearer("/api/v1/moderation/whoami", &pair.access_token)
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_moderator_on_moderator_route() {
    let app = helpers::TestApp::new();
    let (principal, pair) = app.register(Role::Moderator).await;

    let response = app
        .get_bearer("/api/v1/moderation/whoami", &pair.access_token)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.str_field("principal_id"), principal.to_string());
    assert_eq!(response.str_field("role"), "moderator");
}

#[tokio::test]
async fn test_role_gate_authenticates_before_authorizing() {
    let app = helpers::TestApp::new();
    let (principal, _) = app.register(Role::Moderator).await;

    let response = app
        .get("/api/v1/moderation/whoami", Some("malformed-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let expired = app.expired_access_token(principal, Role::Moderator);
    let response = app.get_bearer("/api/v1/moderation/whoami", &expired).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = helpers::TestApp::new();

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.str_field("status"), "ok");
    assert!(response.headers.contains_key("x-request-id"));
}
