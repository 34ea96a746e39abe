//! Entry store trait definition.
//!
//! The `EntryStore` trait defines the interface that storage backends
//! must implement. The seam keeps the core engine-agnostic: any engine
//! with parameterized queries, an upsert-equivalent, and ordering by an
//! integer column can back it.

use crate::auth::Claims;
use crate::entry::Entry;
use crate::error::Result;

/// Keyed entry storage with token-scoped write authorization.
///
/// All implementations must ensure:
/// - `get` and `list` return private copies; mutating one has no effect
///   until it is written back with `update`
/// - `update` replaces the whole entry atomically, never a partial
///   patch
/// - listing is ordered by creation time, most recent first
pub trait EntryStore: Send + Sync {
    /// Fetch the entry stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `GatelinkError::NotFound` if no entry exists under
    /// `name`, or `GatelinkError::CorruptPayload` if a row exists but
    /// its payload cannot be decoded.
    fn get(&self, name: &str) -> Result<Entry>;

    /// List entries ordered by creation time, most recent first.
    ///
    /// With a token, only entries owned by that token are returned;
    /// without one, every entry. An empty store yields an empty vector,
    /// not an error.
    fn list(&self, token: Option<&str>) -> Result<Vec<Entry>>;

    /// Insert or replace the entry stored under `entry.name`.
    ///
    /// The first write for a name creates the entry and records
    /// `claims.token` as its owner. Later writes must come from the
    /// owning token unless `claims.admin` is set; an admin write keeps
    /// the original owner.
    ///
    /// # Errors
    ///
    /// Returns `GatelinkError::NotAuthorized` if the entry exists and
    /// is owned by a different token. Nothing is written in that case.
    fn update(&self, entry: &Entry, claims: &Claims) -> Result<()>;

    /// Delete the entry stored under `name`.
    ///
    /// Without the admin flag, only an entry owned by `claims.token` is
    /// deleted. Deleting a missing entry, or one owned by another
    /// token, affects zero rows and still succeeds — the two cases are
    /// not distinguished.
    fn remove(&self, name: &str, claims: &Claims) -> Result<()>;

    /// Delete every entry owned by `claims.token`, or every entry in
    /// the store when `claims.admin` is set.
    fn clear(&self, claims: &Claims) -> Result<()>;
}
