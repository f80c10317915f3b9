//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted access token lifetime: one day.
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;

/// Longest accepted refresh token lifetime: one year.
pub const MAX_REFRESH_TTL_HOURS: u64 = 366 * 24;

/// Largest accepted clock-skew allowance.
pub const MAX_LEEWAY_SECONDS: u64 = 5 * 60;

/// Signing key, token lifetimes and hashing cost.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric secret used to sign and verify access tokens (HMAC-SHA256).
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_hours: u64,
    /// Allowed clock skew when checking `exp`, in seconds.
    #[serde(default)]
    pub jwt_leeway_seconds: u64,
    /// Cost parameters for the slow secret hash.
    #[serde(default)]
    pub hashing: HashingConfig,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_access_ttl_minutes", &self.jwt_access_ttl_minutes)
            .field("jwt_refresh_ttl_hours", &self.jwt_refresh_ttl_hours)
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .field("hashing", &self.hashing)
            .finish()
    }
}

impl AuthConfig {
    /// Checks that the signing key is present and that both lifetimes and
    /// the leeway fall inside their accepted ranges.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.jwt_access_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.jwt_access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&self.jwt_refresh_ttl_hours) {
            return Err(AppError::configuration(format!(
                "auth.jwt_refresh_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}"
            )));
        }
        if self.jwt_leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(AppError::configuration(format!(
                "auth.jwt_leeway_seconds must not exceed {MAX_LEEWAY_SECONDS}"
            )));
        }
        self.hashing.validate()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl HashingConfig {
    fn validate(&self) -> Result<(), AppError> {
        if self.iterations == 0 || self.parallelism == 0 {
            return Err(AppError::configuration(
                "auth.hashing iterations and parallelism must be positive",
            ));
        }
        if self.memory_kib < 8 * self.parallelism {
            return Err(AppError::configuration(
                "auth.hashing.memory_kib must be at least 8 * parallelism",
            ));
        }
        Ok(())
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    720
}

// Matches argon2::Params::DEFAULT_M_COST / DEFAULT_T_COST / DEFAULT_P_COST.
fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
