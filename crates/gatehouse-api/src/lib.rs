//! # gatehouse-api
//!
//! HTTP layer for Gatehouse built on Axum.
//!
//! Provides the request gates (`auth_only`, `check_role`,
//! `parse_auth_token`), the `AuthContext` extractor, the token rotation
//! endpoint and error-to-response mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, AuthRejection};
pub use extractors::AuthContext;
pub use router::build_router;
pub use state::AppState;
