//! `SQLite`-backed key-value storage.
//!
//! All planner state is stored in a single `kv` table inside
//! `<data dir>/planner.sqlite3`. Each row holds one JSON document.

use crate::error::Result;
use crate::paths;
use crate::traits::KeyValueStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Storage key constants for consistent usage across the codebase.
pub mod keys {
    /// Versioned task collection.
    pub const TASKS: &str = "weeklyTodo";
    /// Category list.
    pub const CATEGORIES: &str = "weeklyTodo_categories";
    /// Earned stickers.
    pub const STICKERS: &str = "weeklyTodo_stickers";
    /// API credential for the planner assistant.
    pub const API_KEY: &str = "weeklyTodo_anthropicKey";
}

/// SQLite-based key-value store.
///
/// Each operation opens a new connection to the database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the database file.
    db_path: PathBuf,
}

impl SqliteStore {
    /// Create a store in the given data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(data_dir: &Path) -> Result<Self> {
        Self::with_path(paths::db_path(data_dir))
    }

    /// Create a store with a specific database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn with_path(db_path: PathBuf) -> Result<Self> {
        let store = Self { db_path };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.open()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}
