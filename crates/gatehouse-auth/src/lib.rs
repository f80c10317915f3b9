//! # gatehouse-auth
//!
//! Authentication core for Gatehouse.
//!
//! ## Modules
//!
//! - `hashing`: Argon2id hashing of passwords and refresh secrets
//! - `jwt`: signed access tokens and opaque refresh tokens
//! - `session`: single-session-per-principal lifecycle (create, rotate, reset)
//! - `error`: typed token and session failures

pub mod error;
pub mod hashing;
pub mod jwt;
pub mod session;

pub use error::{SessionError, TokenError};
pub use hashing::CredentialHasher;
pub use jwt::{AccessClaims, TokenCodec, TokenPair};
pub use session::{MemorySessionStore, PgSessionStore, SessionManager, SessionStore};
