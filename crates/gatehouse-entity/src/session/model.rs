//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gatehouse_core::types::{PrincipalId, SessionId};

/// The single persisted authentication context of one principal.
///
/// Created on the first login or registration, then fully overwritten on
/// every rotation or reset. The refresh secret itself is never stored,
/// only its one-way hash.
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier, fixed at creation.
    pub id: SessionId,
    /// The principal this session belongs to. At most one session per principal.
    pub principal_id: PrincipalId,
    /// Argon2id PHC string of the current refresh secret.
    pub hashed_refresh_token: String,
    /// After this instant the refresh secret is rejected regardless of hash match.
    pub expires_at: DateTime<Utc>,
    /// When the session was first created.
    pub created_at: DateTime<Utc>,
    /// When the hash and expiry were last (re)written.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Builds a brand new session record stamped at `now`.
    pub fn new(
        principal_id: PrincipalId,
        hashed_refresh_token: String,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            principal_id,
            hashed_refresh_token,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the refresh credential has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("principal_id", &self.principal_id)
            .field("hashed_refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
