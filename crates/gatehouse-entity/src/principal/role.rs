//! Principal role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles a principal may hold. Route groups allow-list these by exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular end user.
    Client,
    /// Staff allowed into moderation routes.
    Moderator,
}

impl Role {
    /// Return the role as its lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
