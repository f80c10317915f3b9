//! Token codec: the single entry point for minting and checking credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::types::PrincipalId;
use gatehouse_entity::Role;

use super::claims::AccessClaims;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;
use super::refresh::RefreshTokenIssuer;
use crate::error::TokenError;

/// Result of a successful credential pair generation.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived signed access token.
    pub access_token: String,
    /// Long-lived opaque refresh secret. Only its hash is ever stored.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

/// Issues and verifies access tokens, and mints refresh secrets.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    refresh: RefreshTokenIssuer,
}

impl TokenCodec {
    /// Builds a codec from the configured key, lifetimes and leeway.
    ///
    /// Out-of-range lifetimes or leeway are a `Configuration` error.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoder: JwtEncoder::new(config)?,
            decoder: JwtDecoder::new(config)?,
            refresh: RefreshTokenIssuer::new(config)?,
        })
    }

    /// Signs an access token; fails only if signing itself fails.
    pub fn issue_access_token(
        &self,
        principal_id: PrincipalId,
        role: Role,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.encoder.encode_access_token(principal_id, role)
    }

    #[cfg(test)]
    pub(crate) fn issue_access_token_at(
        &self,
        principal_id: PrincipalId,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.encoder
            .encode_access_token_at(principal_id, role, issued_at)
    }

    /// Mints a fresh random refresh secret and its expiry.
    pub fn issue_refresh_token(&self) -> Result<(String, DateTime<Utc>), AppError> {
        self.refresh.issue()
    }

    /// Mints a matching access token and refresh secret.
    pub fn issue_pair(&self, principal_id: PrincipalId, role: Role) -> Result<TokenPair, AppError> {
        let (access_token, access_expires_at) = self.issue_access_token(principal_id, role)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh_token()?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Verifies an access token. `Expired` is only returned for authentic tokens.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.decoder.verify_access_token(token)
    }

    /// Verifies signature and algorithm but accepts an expired token.
    pub fn decode_ignoring_expiry(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.decoder.decode_ignoring_expiry(token)
    }

    /// Clock-skew allowance applied to `exp`, in seconds.
    pub fn leeway(&self) -> u64 {
        self.decoder.leeway()
    }
}

#[cfg(test)]
pub(crate) fn test_config(secret: &str) -> AuthConfig {
    AuthConfig {
        jwt_secret: secret.to_string(),
        jwt_access_ttl_minutes: 15,
        jwt_refresh_ttl_hours: 24,
        jwt_leeway_seconds: 0,
        hashing: gatehouse_core::config::HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
    }
}
