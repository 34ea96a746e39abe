//! Storage abstraction for Gatelink entries.
//!
//! The storage layer persists entries keyed by their public name and
//! enforces token-scoped write authorization. Reads hand the caller a
//! private copy; nothing is cached in process, so every read decodes
//! fresh from the backend.
//!
//! ## Architecture
//!
//! Backends implement the [`EntryStore`] trait. The default backend is
//! SQLite via `rusqlite`. Its schema keeps the owning token and the
//! creation time as queryable columns next to an opaque JSON payload,
//! so ownership checks and chronological listing never decode a
//! payload.

pub mod sqlite;
pub mod traits;

// Re-export public types
pub use sqlite::SqliteStore;
pub use traits::EntryStore;
