//! Access token verification.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::config::auth::MAX_LEEWAY_SECONDS;
use gatehouse_core::error::AppError;

use super::claims::AccessClaims;
use crate::error::TokenError;

/// Verifies HS256 access tokens against the configured key.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature, algorithm and `exp` checks.
    validation: Validation,
    /// Signature and algorithm checks only.
    validation_no_exp: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        if config.jwt_leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(AppError::configuration(format!(
                "auth.jwt_leeway_seconds must not exceed {MAX_LEEWAY_SECONDS}"
            )));
        }

        // Validation::new pins the accepted algorithm list to exactly HS256.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        let mut validation_no_exp = validation.clone();
        validation_no_exp.validate_exp = false;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            validation_no_exp,
        })
    }

    /// Clock-skew allowance applied to `exp`, in seconds.
    pub fn leeway(&self) -> u64 {
        self.validation.leeway
    }

    /// Verifies signature, algorithm and expiry.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims = self.decode_with(token, &self.validation)?;

        // jsonwebtoken still accepts `exp == now`; a token is live only while exp is ahead.
        if claims.is_expired_at(Utc::now(), self.leeway()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verifies signature and algorithm, ignoring `exp`.
    pub fn decode_ignoring_expiry(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.decode_with(token, &self.validation_no_exp)
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<AccessClaims, TokenError> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => {
                    debug!(error = %e, "Access token rejected as malformed");
                    TokenError::Malformed
                }
            })?;

        Ok(token_data.claims)
    }
}
