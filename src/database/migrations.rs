//! Schema migrations for the ReadStash SQLite database.
//!
//! A `schema_version` table tracks which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the schema version recorded in the database (0 if the table
/// does not exist yet).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    // WAL and foreign keys apply to every connection, not one version
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: articles and highlight records")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Add reading-stats columns to articles")?;
    }

    Ok(())
}

fn record_version(
    conn: &Connection,
    version: i32,
    description: &str,
) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: Article library plus the per-article highlighted-document store.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS articles (
            id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            html_content TEXT,
            site_name TEXT,
            estimated_read_time_minutes INTEGER NOT NULL DEFAULT 1,
            archived INTEGER NOT NULL DEFAULT 0,
            saved_at INTEGER NOT NULL,
            last_opened_at INTEGER,
            open_count INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_articles_url ON articles(url);
        CREATE INDEX IF NOT EXISTS idx_articles_saved_at ON articles(saved_at);
        CREATE INDEX IF NOT EXISTS idx_articles_archived ON articles(archived);

        CREATE TABLE IF NOT EXISTS article_highlights (
            article_id TEXT PRIMARY KEY,
            html TEXT NOT NULL,
            updated_at INTEGER NOT NULL,
            FOREIGN KEY (article_id) REFERENCES articles(id) ON DELETE CASCADE
        );
        ",
    )
}

/// V2: Add reading-stats columns for databases created before V1 had them.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    if conn
        .prepare("SELECT last_opened_at FROM articles LIMIT 0")
        .is_err()
    {
        let _ = conn.execute_batch("ALTER TABLE articles ADD COLUMN last_opened_at INTEGER;");
    }
    if conn
        .prepare("SELECT open_count FROM articles LIMIT 0")
        .is_err()
    {
        let _ = conn.execute_batch(
            "ALTER TABLE articles ADD COLUMN open_count INTEGER NOT NULL DEFAULT 0;",
        );
    }
    Ok(())
}
