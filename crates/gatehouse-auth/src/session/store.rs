//! Session persistence abstraction and its PostgreSQL implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gatehouse_core::result::AppResult;
use gatehouse_core::types::PrincipalId;
use gatehouse_database::repositories::SessionRepository;
use gatehouse_entity::Session;

/// Keyed persistence of at most one [`Session`] per principal.
///
/// Implementations must make `insert` and `overwrite` atomic with respect
/// to each other; the session manager relies on both for its
/// concurrency guarantees.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Load the principal's session, if any.
    async fn find_by_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Session>>;

    /// Whether the principal has a session.
    async fn exists(&self, principal_id: PrincipalId) -> AppResult<bool>;

    /// Store a new session. `Ok(false)` if the principal already has one.
    async fn insert(&self, session: &Session) -> AppResult<bool>;

    /// Replace hash and expiry of the principal's session.
    ///
    /// When `expected_hash` is `Some`, the write only happens if the stored
    /// hash still equals it. `Ok(false)` if nothing was written.
    async fn overwrite(
        &self,
        principal_id: PrincipalId,
        expected_hash: Option<&str>,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Whether the backing storage is reachable.
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// [`SessionStore`] backed by the `sessions` table.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    repo: Arc<SessionRepository>,
}

impl PgSessionStore {
    /// Creates a store over the session repository.
    pub fn new(repo: Arc<SessionRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find_by_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Session>> {
        self.repo.find_by_principal(principal_id).await
    }

    async fn exists(&self, principal_id: PrincipalId) -> AppResult<bool> {
        self.repo.exists(principal_id).await
    }

    async fn insert(&self, session: &Session) -> AppResult<bool> {
        self.repo.insert(session).await
    }

    async fn overwrite(
        &self,
        principal_id: PrincipalId,
        expected_hash: Option<&str>,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.repo
            .overwrite(principal_id, expected_hash, new_hash, expires_at)
            .await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.repo.health_check().await
    }
}
