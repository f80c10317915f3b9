//! Integration tests for token rotation over HTTP.

mod helpers;

use axum::http::StatusCode;

use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Role;

#[tokio::test]
async fn test_rotation_chain() {
    let app = helpers::TestApp::new();
    let (_, first) = app.register(Role::Client).await;

    let response = app
        .update_tokens(&first.access_token, &first.refresh_token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let a2 = response.str_field("access_token");
    let r2 = response.str_field("refresh_token");
    assert_ne!(a2, first.access_token);
    assert_ne!(r2, first.refresh_token);

    // Replaying the rotated-away secret fails.
    let replay = app.update_tokens(&a2, &first.refresh_token).await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
    assert_eq!(replay.error_code(), "INVALID_REFRESH_TOKEN");

    let response = app.update_tokens(&a2, &r2).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_rotation_accepts_expired_access_token() {
    let app = helpers::TestApp::new();
    let (principal, pair) = app.register(Role::Moderator).await;
    let expired = app.expired_access_token(principal, Role::Moderator);

    let response = app.update_tokens(&expired, &pair.refresh_token).await;

    assert_eq!(response.status, StatusCode::OK);
    let fresh = response.str_field("access_token");
    let whoami = app.get_bearer("/api/v1/moderation/whoami", &fresh).await;
    assert_eq!(whoami.status, StatusCode::OK);
}

#[tokio::test]
async fn test_rotation_without_session() {
    let app = helpers::TestApp::new();
    let stranger = PrincipalId::new();
    let token = app.expired_access_token(stranger, Role::Client);

    let response = app.update_tokens(&token, "whatever").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "NO_SESSION");
}

#[tokio::test]
async fn test_rotation_with_wrong_or_missing_secret() {
    let app = helpers::TestApp::new();
    let (_, pair) = app.register(Role::Client).await;

    let response = app.update_tokens(&pair.access_token, "guessed").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_REFRESH_TOKEN");

    let response = app
        .get_bearer("/api/v1/update-tokens", &pair.access_token)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_REFRESH_TOKEN");

    // Failed attempts leave the real secret intact.
    let response = app
        .update_tokens(&pair.access_token, &pair.refresh_token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_rotation_gate_rejects_bad_credentials_as_header_errors() {
    let app = helpers::TestApp::new();
    let (principal, pair) = app.register(Role::Client).await;

    let response = app
        .get(
            &format!("/api/v1/update-tokens?refresh_token={}", pair.refresh_token),
            Some("malformed-token"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_AUTH_HEADER");

    let foreign = app.foreign_access_token(principal, Role::Client);
    let response = app.update_tokens(&foreign, &pair.refresh_token).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_AUTH_HEADER");
}

#[tokio::test]
async fn test_login_reset_invalidates_outstanding_refresh_token() {
    let app = helpers::TestApp::new();
    let (principal, original) = app.register(Role::Client).await;

    let reset = app
        .sessions
        .reset_session(principal, Role::Client)
        .await
        .expect("reset should succeed");

    let response = app
        .update_tokens(&reset.access_token, &original.refresh_token)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_REFRESH_TOKEN");

    let response = app
        .update_tokens(&reset.access_token, &reset.refresh_token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.store.len(), 1);
}
