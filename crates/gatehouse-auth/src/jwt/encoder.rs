//! Access token signing with the configured HMAC key and TTL.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::config::auth::MAX_ACCESS_TTL_MINUTES;
use gatehouse_core::error::AppError;
use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Role;

use super::claims::AccessClaims;

/// Creates HS256-signed access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL.
    access_ttl: TimeDelta,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails if the access TTL exceeds [`MAX_ACCESS_TTL_MINUTES`].
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let access_ttl = Some(config.jwt_access_ttl_minutes)
            .filter(|m| *m <= MAX_ACCESS_TTL_MINUTES)
            .and_then(|m| i64::try_from(m).ok())
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "auth.jwt_access_ttl_minutes is out of range: {}",
                    config.jwt_access_ttl_minutes
                ))
            })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl,
        })
    }

    /// Signs an access token for `principal_id` expiring one TTL from now.
    pub fn encode_access_token(
        &self,
        principal_id: PrincipalId,
        role: Role,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.encode_access_token_at(principal_id, role, Utc::now())
    }

    /// Signs an access token as if issued at `issued_at`.
    pub(crate) fn encode_access_token_at(
        &self,
        principal_id: PrincipalId,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let exp = issued_at
            .checked_add_signed(self.access_ttl)
            .ok_or_else(|| AppError::internal("Access token expiry overflows the calendar"))?;

        let claims = AccessClaims {
            sub: principal_id,
            role,
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, exp))
    }
}
