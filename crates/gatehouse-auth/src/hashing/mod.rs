//! Slow, salted one-way hashing of secrets.

pub mod hasher;

pub use hasher::CredentialHasher;
