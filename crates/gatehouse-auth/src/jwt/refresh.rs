//! Opaque refresh token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use rand::RngCore;
use rand::rngs::OsRng;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::config::auth::MAX_REFRESH_TTL_HOURS;
use gatehouse_core::error::AppError;

/// Bytes of entropy in every refresh secret.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Mints random refresh secrets stamped with the configured lifetime.
#[derive(Debug, Clone)]
pub struct RefreshTokenIssuer {
    ttl: TimeDelta,
}

impl RefreshTokenIssuer {
    /// Creates an issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let ttl = Some(config.jwt_refresh_ttl_hours)
            .filter(|h| *h <= MAX_REFRESH_TTL_HOURS)
            .and_then(|h| i64::try_from(h).ok())
            .and_then(TimeDelta::try_hours)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "auth.jwt_refresh_ttl_hours is out of range: {}",
                    config.jwt_refresh_ttl_hours
                ))
            })?;

        Ok(Self { ttl })
    }

    /// Draws a fresh secret from the OS CSPRNG and stamps `now + ttl`.
    pub fn issue(&self) -> Result<(String, DateTime<Utc>), AppError> {
        self.issue_at(Utc::now())
    }

    pub(crate) fn issue_at(&self, now: DateTime<Utc>) -> Result<(String, DateTime<Utc>), AppError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| AppError::internal(format!("Entropy source failed: {e}")))?;

        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::internal("Refresh token expiry overflows the calendar"))?;

        Ok((URL_SAFE_NO_PAD.encode(bytes), expires_at))
    }
}
