//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gatehouse_auth::{SessionManager, SessionStore, TokenCodec};
use gatehouse_core::config::AppConfig;

/// Shared dependencies, passed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Access token codec.
    pub codec: Arc<TokenCodec>,
    /// Session lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// Session persistence, for health reporting.
    pub store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("session_manager", &self.session_manager)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires state around an already-built session manager.
    pub fn new(config: AppConfig, session_manager: SessionManager) -> Self {
        Self {
            config: Arc::new(config),
            codec: Arc::clone(session_manager.codec()),
            store: Arc::clone(session_manager.store()),
            session_manager: Arc::new(session_manager),
        }
    }
}
