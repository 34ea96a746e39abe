//! # Gatelink Core
//!
//! Core library for Gatelink - a self-hosted gated short-link service.
//!
//! This crate provides the entry data model, the caller authorization
//! contract, and the persistence layer, independent of the serving front
//! end.
//!
//! ## Architecture
//!
//! - **entry**: Entry model and lifecycle rules (expiry, access counting,
//!   training mode)
//! - **auth**: Caller claims consumed by every mutating store operation
//! - **storage**: Entry store trait and the SQLite backend

pub mod auth;
pub mod entry;
pub mod error;
pub mod storage;

pub use auth::Claims;
pub use entry::{Blacklist, Entry};
pub use error::{GatelinkError, Result};
pub use storage::{EntryStore, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
