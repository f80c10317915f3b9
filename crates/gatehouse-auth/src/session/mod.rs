//! Single-session-per-principal lifecycle.

pub mod manager;
pub mod memory;
pub mod store;

pub use manager::SessionManager;
pub use memory::MemorySessionStore;
pub use store::{PgSessionStore, SessionStore};
