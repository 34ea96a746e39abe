//! SQLite storage backend.
//!
//! Entries live in a single table keyed by name. The owning token and
//! the creation time are first-class columns used for ownership checks
//! and ordering; the rest of the entry is an opaque JSON payload.
//! Schema setup is idempotent, so opening an already-initialized
//! database is safe.

mod row;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::auth::Claims;
use crate::entry::Entry;
use crate::error::{GatelinkError, Result};
use crate::storage::traits::EntryStore;

use row::EntryRow;

/// SQLite-backed entry store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store backed by the database at `path`, creating the
    /// database and schema as needed.
    ///
    /// # Errors
    ///
    /// Returns `GatelinkError::Sqlite` if the database cannot be opened
    /// or the schema cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a store backed by an in-memory database.
    ///
    /// Contents are lost when the store is dropped; useful for tests
    /// and throwaway deployments.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                name TEXT PRIMARY KEY NOT NULL,
                token TEXT NOT NULL,
                creation INTEGER NOT NULL,
                payload BLOB NOT NULL
            );
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GatelinkError::Storage("SQLite connection poisoned".to_string()))
    }
}

impl EntryStore for SqliteStore {
    fn get(&self, name: &str) -> Result<Entry> {
        let conn = self.lock_conn()?;

        let result = conn.query_row(
            "SELECT payload FROM entries WHERE name = ?",
            [name],
            |row| row.get::<_, Vec<u8>>(0),
        );

        match result {
            Ok(payload) => EntryRow {
                name: name.to_string(),
                payload,
            }
            .try_into(),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(GatelinkError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, token: Option<&str>) -> Result<Vec<Entry>> {
        let conn = self.lock_conn()?;

        let mut query = String::from("SELECT name, payload FROM entries");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(token) = token {
            query.push_str(" WHERE token = ?");
            params.push(Box::new(token.to_string()));
        }
        query.push_str(" ORDER BY creation DESC");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (name, payload) = row?;
            entries.push(EntryRow { name, payload }.try_into()?);
        }

        Ok(entries)
    }

    fn update(&self, entry: &Entry, claims: &Claims) -> Result<()> {
        let mut conn = self.lock_conn()?;

        // Ownership check and replace must not be separable.
        let tx = conn.transaction()?;

        let owner: Option<String> = tx
            .query_row(
                "SELECT token FROM entries WHERE name = ?",
                [&entry.name],
                |row| row.get(0),
            )
            .optional()?;

        let token = match owner {
            // The entry does not exist; creation establishes ownership.
            None => claims.token.clone(),
            Some(owner) => {
                if !claims.admin && owner != claims.token {
                    return Err(GatelinkError::NotAuthorized(entry.name.clone()));
                }
                owner
            }
        };

        let payload = row::encode(entry)?;
        tx.execute(
            "REPLACE INTO entries (name, token, creation, payload) VALUES (?, ?, ?, ?)",
            (&entry.name, &token, entry.creation.timestamp(), &payload),
        )?;

        tx.commit()?;

        debug!(name = %entry.name, "entry written");
        Ok(())
    }

    fn remove(&self, name: &str, claims: &Claims) -> Result<()> {
        let conn = self.lock_conn()?;

        let affected = if claims.admin {
            conn.execute("DELETE FROM entries WHERE name = ?", [name])?
        } else {
            conn.execute(
                "DELETE FROM entries WHERE name = ? AND token = ?",
                (name, &claims.token),
            )?
        };

        debug!(name, affected, "entry removed");
        Ok(())
    }

    fn clear(&self, claims: &Claims) -> Result<()> {
        let conn = self.lock_conn()?;

        let affected = if claims.admin {
            conn.execute("DELETE FROM entries", [])?
        } else {
            conn.execute("DELETE FROM entries WHERE token = ?", [&claims.token])?
        };

        debug!(affected, "entries cleared");
        Ok(())
    }
}
