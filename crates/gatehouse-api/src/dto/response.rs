//! Response DTOs.

use serde::{Deserialize, Serialize};

use gatehouse_auth::TokenPair;

/// Freshly issued credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokensResponse {
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh secret.
    pub refresh_token: String,
}

impl From<TokenPair> for TokensResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Whether the session store answered.
    pub session_store: bool,
    /// Crate version.
    pub version: String,
}
