//! Highlight record store for ReadStash.
//!
//! Persists one serialized highlighted document per article. The reading
//! surface saves through here on every highlight mutation, so the store
//! must never get in the way: reads that fail report "no record", writes
//! that fail are logged and dropped. The user's on-screen highlight is
//! already applied either way.

use rusqlite::{params, Connection};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::types::errors::HighlightError;

/// Trait defining highlight record operations.
pub trait HighlightStoreTrait {
    /// Returns the saved highlighted document, or `None` when no record
    /// exists. Read failures also report `None`; they are logged, not
    /// surfaced.
    fn get(&self, article_id: &str) -> Option<String>;
    /// Saves (or overwrites) the highlighted document for an article.
    /// Write failures are logged at warn and otherwise swallowed.
    fn set(&mut self, article_id: &str, html: &str);
    /// Removes the record for an article. Absent records are fine.
    fn delete(&mut self, article_id: &str) -> Result<(), HighlightError>;
    /// Whether a record exists for the article.
    fn has_record(&self, article_id: &str) -> bool;
    /// Timestamp of the last save for an article, if any.
    fn updated_at(&self, article_id: &str) -> Option<i64>;
}

/// Highlight store backed by a SQLite connection.
pub struct HighlightStore<'a> {
    conn: &'a Connection,
}

impl<'a> HighlightStore<'a> {
    /// Creates a new `HighlightStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl<'a> HighlightStoreTrait for HighlightStore<'a> {
    fn get(&self, article_id: &str) -> Option<String> {
        match self.conn.query_row(
            "SELECT html FROM article_highlights WHERE article_id = ?1",
            params![article_id],
            |row| row.get::<_, String>(0),
        ) {
            Ok(html) => Some(html),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                debug!(article_id, "no highlight record");
                None
            }
            Err(e) => {
                // Treated the same as absent; the caller falls back to
                // normalizing the original content.
                warn!(article_id, error = %e, "highlight record read failed");
                None
            }
        }
    }

    fn set(&mut self, article_id: &str, html: &str) {
        let now = Self::now();
        let result = self.conn.execute(
            "INSERT INTO article_highlights (article_id, html, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(article_id) DO UPDATE SET html = excluded.html, updated_at = excluded.updated_at",
            params![article_id, html, now],
        );
        if let Err(e) = result {
            // The on-screen mutation stands; losing the save only costs
            // durability across restarts.
            warn!(article_id, error = %e, "highlight record write failed");
        } else {
            debug!(article_id, bytes = html.len(), "highlight record saved");
        }
    }

    fn delete(&mut self, article_id: &str) -> Result<(), HighlightError> {
        self.conn
            .execute(
                "DELETE FROM article_highlights WHERE article_id = ?1",
                params![article_id],
            )
            .map_err(|e| HighlightError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn has_record(&self, article_id: &str) -> bool {
        self.get(article_id).is_some()
    }

    fn updated_at(&self, article_id: &str) -> Option<i64> {
        self.conn
            .query_row(
                "SELECT updated_at FROM article_highlights WHERE article_id = ?1",
                params![article_id],
                |row| row.get::<_, i64>(0),
            )
            .ok()
    }
}
