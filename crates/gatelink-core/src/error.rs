//! Error types for Gatelink core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the front end layers map
//! these to user-facing responses.

use thiserror::Error;

/// Result type alias for Gatelink operations.
pub type Result<T> = std::result::Result<T, GatelinkError>;

/// Core error type for Gatelink operations.
#[derive(Debug, Error)]
pub enum GatelinkError {
    /// No entry exists under the requested name
    #[error("Entry not found: {0:?}")]
    NotFound(String),

    /// Caller's token does not match the entry's owning token
    #[error("Not authorized to modify entry {0:?}")]
    NotAuthorized(String),

    /// A stored payload exists but cannot be decoded
    #[error("Corrupt payload for entry {name:?}: {source}")]
    CorruptPayload {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
