//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Session;

/// Repository for the one-row-per-principal `sessions` table.
///
/// Every mutating method is a single statement, so a dropped future
/// either commits the whole row change or none of it.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the session held by a principal.
    pub async fn find_by_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT id, principal_id, hashed_refresh_token, expires_at, created_at, updated_at \
             FROM sessions WHERE principal_id = $1",
        )
        .bind(principal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Whether a principal holds a session.
    pub async fn exists(&self, principal_id: PrincipalId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sessions WHERE principal_id = $1)",
        )
        .bind(principal_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check session existence", e)
        })
    }

    /// Insert a new session. Returns `false` if the principal already has one.
    pub async fn insert(&self, session: &Session) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO sessions (id, principal_id, hashed_refresh_token, expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (principal_id) DO NOTHING",
        )
        .bind(session.id)
        .bind(session.principal_id)
        .bind(&session.hashed_refresh_token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))?;

        Ok(result.rows_affected() == 1)
    }

    /// Replace the refresh hash and expiry of a principal's session.
    ///
    /// With `expected_hash` set, the row is only written if its current hash
    /// still equals it. Returns `false` if no row matched.
    pub async fn overwrite(
        &self,
        principal_id: PrincipalId,
        expected_hash: Option<&str>,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET hashed_refresh_token = $1, expires_at = $2, updated_at = NOW() \
             WHERE principal_id = $3 AND ($4::text IS NULL OR hashed_refresh_token = $4)",
        )
        .bind(new_hash)
        .bind(expires_at)
        .bind(principal_id)
        .bind(expected_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update session", e))?;

        Ok(result.rows_affected() == 1)
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
