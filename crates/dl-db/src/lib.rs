//! Storage layer for the daily activity log.
//!
//! Persists the day log, the task catalog and the goal list as JSON documents
//! under named keys, one row per key, using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ```text
//! documents(key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL)
//! ```
//!
//! `value` holds the serde JSON of the document; `updated_at` is RFC 3339 UTC.
//!
//! # Load Failures
//!
//! A missing document loads as its default. A document that no longer
//! deserializes is logged and also replaced by its default, so a corrupt
//! value never blocks the tracker. SQLite errors are always returned.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use dl_core::{DayLog, Goal, TaskCatalog};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A document could not be serialized for storage.
    #[error("failed to encode {key} document: {source}")]
    Encode {
        key: DocumentKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Names under which documents are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Days,
    Tasks,
    Goals,
}

impl DocumentKey {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Tasks => "tasks",
            Self::Goals => "goals",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    pub fn load_days(&self) -> Result<DayLog, DbError> {
        self.load_or_default(DocumentKey::Days, DayLog::default)
    }

    pub fn save_days(&self, days: &DayLog) -> Result<(), DbError> {
        self.save(DocumentKey::Days, days)
    }

    /// Loads the task catalog, or the built-in default set when none is stored.
    pub fn load_tasks(&self) -> Result<TaskCatalog, DbError> {
        self.load_or_default(DocumentKey::Tasks, TaskCatalog::default)
    }

    pub fn save_tasks(&self, tasks: &TaskCatalog) -> Result<(), DbError> {
        self.save(DocumentKey::Tasks, tasks)
    }

    pub fn load_goals(&self) -> Result<Vec<Goal>, DbError> {
        self.load_or_default(DocumentKey::Goals, Vec::new)
    }

    pub fn save_goals(&self, goals: &[Goal]) -> Result<(), DbError> {
        self.save(DocumentKey::Goals, goals)
    }

    /// Removes a document. Returns whether one existed.
    pub fn clear(&self, key: DocumentKey) -> Result<bool, DbError> {
        let removed = self
            .conn
            .execute("DELETE FROM documents WHERE key = ?", [key.as_str()])?;
        Ok(removed > 0)
    }

    /// When a document was last written, if it exists.
    pub fn updated_at(&self, key: DocumentKey) -> Result<Option<DateTime<Utc>>, DbError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM documents WHERE key = ?",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        }))
    }

    fn raw_document(&self, key: DocumentKey) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn load_or_default<T, F>(&self, key: DocumentKey, default: F) -> Result<T, DbError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let Some(raw) = self.raw_document(key)? else {
            tracing::debug!(%key, "no stored document, using default");
            return Ok(default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(%key, %err, "stored document is unreadable, using default");
                Ok(default())
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: DocumentKey, value: &T) -> Result<(), DbError> {
        let json =
            serde_json::to_string(value).map_err(|source| DbError::Encode { key, source })?;
        self.conn.execute(
            "
            INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key.as_str(), json, format_timestamp(Utc::now())],
        )?;
        tracing::debug!(%key, bytes = json.len(), "saved document");
        Ok(())
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
