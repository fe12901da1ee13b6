//! Article Manager for ReadStash.
//!
//! Implements `ArticleManagerTrait` — saving, listing, searching, archiving,
//! and deleting library articles, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::types::article::{Article, NewArticle};
use crate::types::errors::ArticleError;

/// Words per minute assumed when estimating read time.
const READ_WORDS_PER_MINUTE: usize = 200;

/// Trait defining article library operations.
pub trait ArticleManagerTrait {
    fn save_article(&mut self, input: NewArticle) -> Result<Article, ArticleError>;
    fn get_article(&self, id: &str) -> Result<Article, ArticleError>;
    fn list_articles(&self, include_archived: bool) -> Result<Vec<Article>, ArticleError>;
    /// Paginated listing, newest saves first. Returns (articles, total_count).
    fn list_articles_paginated(
        &self,
        include_archived: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Article>, i64), ArticleError>;
    fn search_articles(&self, query: &str) -> Result<Vec<Article>, ArticleError>;
    fn delete_article(&mut self, id: &str) -> Result<(), ArticleError>;
    fn set_archived(&mut self, id: &str, archived: bool) -> Result<(), ArticleError>;
    fn record_open(&mut self, id: &str) -> Result<(), ArticleError>;
}

/// Article manager backed by a SQLite connection.
pub struct ArticleManager<'a> {
    conn: &'a Connection,
}

impl<'a> ArticleManager<'a> {
    /// Creates a new `ArticleManager` using the provided database connection.
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

    /// Estimates reading time from plain-text word count, minimum one minute.
    fn estimate_read_time(content: &str) -> u32 {
        let words = content.split_whitespace().count();
        ((words + READ_WORDS_PER_MINUTE - 1) / READ_WORDS_PER_MINUTE).max(1) as u32
    }

    /// Checks whether an article with the given URL is already saved.
    fn url_exists(&self, url: &str) -> Result<bool, ArticleError> {
        let count: i32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM articles WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;
        Ok(count > 0)
    }

    /// Reads a single `Article` row into a struct.
    fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<Article> {
        Ok(Article {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            html_content: row.get(4)?,
            site_name: row.get(5)?,
            estimated_read_time_minutes: row.get(6)?,
            archived: row.get::<_, i64>(7)? != 0,
            saved_at: row.get(8)?,
            last_opened_at: row.get(9)?,
            open_count: row.get(10)?,
        })
    }

    const SELECT_COLUMNS: &'static str = "id, url, title, content, html_content, site_name, \
         estimated_read_time_minutes, archived, saved_at, last_opened_at, open_count";
}

impl<'a> ArticleManagerTrait for ArticleManager<'a> {
    /// Saves a new article. Returns the stored record with its generated ID.
    fn save_article(&mut self, input: NewArticle) -> Result<Article, ArticleError> {
        let url = input.url.trim();
        if url.is_empty() || !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ArticleError::InvalidUrl(input.url));
        }
        if self.url_exists(url)? {
            return Err(ArticleError::DuplicateUrl(url.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let now = Self::now();
        let title = if input.title.trim().is_empty() {
            url.to_string()
        } else {
            input.title.trim().to_string()
        };
        let read_time = Self::estimate_read_time(&input.content);

        self.conn
            .execute(
                "INSERT INTO articles (id, url, title, content, html_content, site_name, \
                 estimated_read_time_minutes, archived, saved_at, last_opened_at, open_count) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, NULL, 0)",
                params![
                    id,
                    url,
                    title,
                    input.content,
                    input.html_content,
                    input.site_name,
                    read_time,
                    now
                ],
            )
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        Ok(Article {
            id,
            url: url.to_string(),
            title,
            content: input.content,
            html_content: input.html_content,
            site_name: input.site_name,
            estimated_read_time_minutes: read_time,
            archived: false,
            saved_at: now,
            last_opened_at: None,
            open_count: 0,
        })
    }

    /// Fetches a single article by ID.
    fn get_article(&self, id: &str) -> Result<Article, ArticleError> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM articles WHERE id = ?1",
                    Self::SELECT_COLUMNS
                ),
                params![id],
                Self::row_to_article,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => ArticleError::NotFound(id.to_string()),
                other => ArticleError::DatabaseError(other.to_string()),
            })
    }

    /// Lists articles, newest saves first. Archived articles are excluded
    /// unless `include_archived` is set.
    fn list_articles(&self, include_archived: bool) -> Result<Vec<Article>, ArticleError> {
        let sql = if include_archived {
            format!(
                "SELECT {} FROM articles ORDER BY saved_at DESC",
                Self::SELECT_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM articles WHERE archived = 0 ORDER BY saved_at DESC",
                Self::SELECT_COLUMNS
            )
        };

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_article)
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| ArticleError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    fn list_articles_paginated(
        &self,
        include_archived: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Article>, i64), ArticleError> {
        let total: i64 = if include_archived {
            self.conn
                .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
        } else {
            self.conn.query_row(
                "SELECT COUNT(*) FROM articles WHERE archived = 0",
                [],
                |row| row.get(0),
            )
        }
        .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let sql = if include_archived {
            format!(
                "SELECT {} FROM articles ORDER BY saved_at DESC LIMIT ?1 OFFSET ?2",
                Self::SELECT_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM articles WHERE archived = 0 ORDER BY saved_at DESC LIMIT ?1 OFFSET ?2",
                Self::SELECT_COLUMNS
            )
        };

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit, offset], Self::row_to_article)
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| ArticleError::DatabaseError(e.to_string()))?);
        }
        Ok((results, total))
    }

    /// Searches articles by title, URL, or body text using SQL LIKE.
    fn search_articles(&self, query: &str) -> Result<Vec<Article>, ArticleError> {
        let pattern = format!("%{}%", query);
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM articles \
                 WHERE title LIKE ?1 OR url LIKE ?2 OR content LIKE ?3 \
                 ORDER BY saved_at DESC",
                Self::SELECT_COLUMNS
            ))
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params![pattern, pattern, pattern], Self::row_to_article)
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| ArticleError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }

    /// Deletes an article and its highlight record.
    fn delete_article(&mut self, id: &str) -> Result<(), ArticleError> {
        // Remove the highlight record first; the FK cascade also covers
        // this, but old databases may predate the constraint.
        self.conn
            .execute(
                "DELETE FROM article_highlights WHERE article_id = ?1",
                params![id],
            )
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        let affected = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1", params![id])
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(ArticleError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Archives or unarchives an article.
    fn set_archived(&mut self, id: &str, archived: bool) -> Result<(), ArticleError> {
        let affected = self
            .conn
            .execute(
                "UPDATE articles SET archived = ?1 WHERE id = ?2",
                params![archived as i64, id],
            )
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(ArticleError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Records that the article was opened for reading: bumps the open
    /// counter and stamps the open time.
    fn record_open(&mut self, id: &str) -> Result<(), ArticleError> {
        let now = Self::now();
        let affected = self
            .conn
            .execute(
                "UPDATE articles SET open_count = open_count + 1, last_opened_at = ?1 WHERE id = ?2",
                params![now, id],
            )
            .map_err(|e| ArticleError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(ArticleError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
