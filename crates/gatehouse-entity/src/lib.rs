//! # gatehouse-entity
//!
//! Domain models for Gatehouse. `Session` is a database row and derives
//! `sqlx::FromRow`; `Role` is a value object carried inside access claims.

pub mod principal;
pub mod session;

pub use principal::Role;
pub use session::Session;
