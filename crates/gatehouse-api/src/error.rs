//! Maps domain failures to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use gatehouse_auth::{SessionError, TokenError};
use gatehouse_core::error::AppError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    let body = ApiErrorResponse {
        error: code.to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

/// Handler-level error. Internal detail is logged, never returned.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: "Internal server error".to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        // Every AppError is infrastructure; none of it reaches the caller.
        tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
        Self::internal()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        // Both caller-side failures answer 400: the client must log in again.
        match err {
            SessionError::NoSession => Self {
                status: StatusCode::BAD_REQUEST,
                code: "NO_SESSION",
                message: "No session for this principal, log in again".to_string(),
            },
            SessionError::InvalidRefreshToken => Self {
                status: StatusCode::BAD_REQUEST,
                code: "INVALID_REFRESH_TOKEN",
                message: "Invalid refresh token".to_string(),
            },
            SessionError::Internal => Self::internal(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status, self.code, self.message)
    }
}

/// Why a request gate turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// `Authorization` header absent or not exactly `Bearer <token>`.
    InvalidAuthHeader,
    /// Token malformed or its signature does not verify.
    InvalidToken,
    /// Token authentic but expired.
    TokenExpired,
    /// Authenticated, but the role is not allowed on this route.
    Forbidden,
}

impl AuthRejection {
    /// Status code for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Forbidden => "FORBIDDEN",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::InvalidAuthHeader => "Invalid auth header",
            Self::InvalidToken => "Invalid token, log in again or update tokens",
            Self::TokenExpired => "Token has expired, update tokens",
            Self::Forbidden => "Access denied for this role",
        }
    }
}

impl From<TokenError> for AuthRejection {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::TokenExpired,
            TokenError::Malformed | TokenError::InvalidSignature => Self::InvalidToken,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), self.message())
    }
}
