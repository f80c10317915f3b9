//! Request DTOs.

use serde::Deserialize;

/// Query string of `GET /api/v1/update-tokens`.
#[derive(Deserialize)]
pub struct UpdateTokensQuery {
    /// Refresh secret issued with the previous pair. Missing means empty.
    #[serde(default)]
    pub refresh_token: String,
}

impl std::fmt::Debug for UpdateTokensQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateTokensQuery").finish_non_exhaustive()
    }
}
