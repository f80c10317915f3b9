//! # gatehouse-database
//!
//! PostgreSQL connection management, migrations and the concrete
//! session repository.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
