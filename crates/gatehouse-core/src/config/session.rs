//! Session persistence configuration.

use serde::{Deserialize, Serialize};

/// Which session store backs the session orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStoreKind {
    /// PostgreSQL `sessions` table.
    #[default]
    Postgres,
    /// Process-local map. Single node only; sessions are lost on restart.
    Memory,
}

/// Session management configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Backing store for session records.
    #[serde(default)]
    pub store: SessionStoreKind,
}
