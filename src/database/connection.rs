//! SQLite connection management for ReadStash.
//!
//! [`Database`] wraps a `rusqlite::Connection` and runs schema migrations
//! on open, so callers always see the current schema.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Owns the SQLite connection backing the article library and the
/// highlight record store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path` and migrates it.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established
    /// or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Opens an in-memory database and migrates it. The data is discarded
    /// when the `Database` is dropped; tests use this.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established
    /// or migrations fail.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Applies pending schema migrations. Idempotent; safe on every start.
    fn run_migrations(&self) -> Result<(), rusqlite::Error> {
        migrations::run_all(&self.conn)
    }

    /// Borrow the underlying connection for the managers to query against.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
