//! Typed failures of the token codec and the session orchestrator.

use thiserror::Error;
use tracing::error;

use gatehouse_core::AppError;

/// Why an access token was rejected.
///
/// `Expired` is only ever reported for a token whose signature verified,
/// so callers can tell tampering apart from staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a structurally valid token, or its claims do not decode.
    #[error("malformed token")]
    Malformed,
    /// Signature does not verify under the configured key and algorithm.
    #[error("invalid token signature")]
    InvalidSignature,
    /// Signature is valid but `exp` has passed.
    #[error("token has expired")]
    Expired,
}

/// Outcome of a failed session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Infrastructure or crypto failure. Detail is logged, never surfaced.
    #[error("internal error")]
    Internal,
    /// No session exists for the principal; a full login is required.
    #[error("no session")]
    NoSession,
    /// The presented refresh secret is wrong, expired, or already rotated away.
    #[error("invalid refresh token")]
    InvalidRefreshToken,
}

impl SessionError {
    /// Logs an infrastructure failure and collapses it to [`SessionError::Internal`].
    pub(crate) fn internal(context: &'static str, err: AppError) -> Self {
        error!(kind = %err.kind, error = %err.message, "{context}");
        Self::Internal
    }
}
