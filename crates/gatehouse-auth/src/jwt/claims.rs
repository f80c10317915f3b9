//! Claims carried inside every access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Role;

/// JWT claims payload of an access token.
///
/// Rebuilt from the token on every verification; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the principal ID.
    pub sub: PrincipalId,
    /// Role at the time of issuance.
    pub role: Role,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token ID, so two tokens minted in the same second differ.
    pub jti: Uuid,
}

impl AccessClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether the token is expired at `now`, allowing `leeway_seconds` of skew.
    ///
    /// A token is only live while `exp` is strictly in the future.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_seconds: u64) -> bool {
        let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
        now.timestamp() >= self.exp.saturating_add(leeway)
    }

    /// Whether the token has expired, with no leeway.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now(), 0)
    }
}
