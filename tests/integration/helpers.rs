//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use gatehouse_api::AppState;
use gatehouse_auth::{CredentialHasher, MemorySessionStore, SessionManager, TokenCodec, TokenPair};
use gatehouse_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, HashingConfig, LoggingConfig, ServerConfig,
    SessionConfig, SessionStoreKind,
};
use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Role;

pub const SECRET: &str = "integration-test-secret";

/// Test application over the in-memory session store.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Session manager shared with the router.
    pub sessions: Arc<SessionManager>,
    /// Backing store, for direct inspection.
    pub store: Arc<MemorySessionStore>,
    /// Application config.
    pub config: AppConfig,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        auth: auth_config(SECRET, 15),
        session: SessionConfig {
            store: SessionStoreKind::Memory,
        },
        logging: LoggingConfig::default(),
    }
}

fn auth_config(secret: &str, access_ttl_minutes: u64) -> AuthConfig {
    AuthConfig {
        jwt_secret: secret.to_string(),
        jwt_access_ttl_minutes: access_ttl_minutes,
        jwt_refresh_ttl_hours: 24,
        jwt_leeway_seconds: 0,
        hashing: HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
    }
}

impl TestApp {
    /// Create a new test application.
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemorySessionStore::new());
        let codec = Arc::new(TokenCodec::new(&config.auth).expect("Failed to build codec"));
        let hasher = Arc::new(
            CredentialHasher::new(&config.auth.hashing).expect("Failed to build hasher"),
        );

        let manager = SessionManager::new(codec, hasher, store.clone());
        let state = AppState::new(config.clone(), manager);
        let sessions = Arc::clone(&state.session_manager);
        let router = gatehouse_api::build_router(state);

        Self {
            router,
            sessions,
            store,
            config,
        }
    }

    /// Open a session for a fresh principal, as registration would.
    pub async fn register(&self, role: Role) -> (PrincipalId, TokenPair) {
        let principal = PrincipalId::new();
        let pair = self
            .sessions
            .create(principal, role)
            .await
            .expect("Failed to create session");
        (principal, pair)
    }

    /// An access token signed with the right key whose `exp` is already reached.
    pub fn expired_access_token(&self, principal: PrincipalId, role: Role) -> String {
        TokenCodec::new(&auth_config(SECRET, 0))
            .expect("Failed to build codec")
            .issue_access_token(principal, role)
            .expect("Failed to sign token")
            .0
    }

    /// A live access token signed with a key the server does not know.
    pub fn foreign_access_token(&self, principal: PrincipalId, role: Role) -> String {
        TokenCodec::new(&auth_config("someone-elses-secret", 15))
            .expect("Failed to build codec")
            .issue_access_token(principal, role)
            .expect("Failed to sign token")
            .0
    }

    /// Make a GET request with an optional raw `Authorization` value.
    pub async fn get(&self, path: &str, authorization: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);

        if let Some(value) = authorization {
            req = req.header("Authorization", value);
        }

        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET with `Authorization: Bearer <token>`.
    pub async fn get_bearer(&self, path: &str, token: &str) -> TestResponse {
        self.get(path, Some(&format!("Bearer {token}"))).await
    }

    /// Call the rotation endpoint.
    pub async fn update_tokens(&self, access_token: &str, refresh_token: &str) -> TestResponse {
        self.get_bearer(
            &format!("/api/v1/update-tokens?refresh_token={refresh_token}"),
            access_token,
        )
        .await
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Parsed JSON body.
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }

    /// A string field of a success body.
    pub fn str_field(&self, name: &str) -> String {
        self.body
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| panic!("No {name} in body: {:?}", self.body))
            .to_string()
    }
}
