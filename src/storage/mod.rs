//! Local client state
//!
//! Everything the client remembers between runs (credential, session
//! metadata, daily usage counter) lives in a string-to-string key-value
//! store. Components take the store as an injected [`KeyValueStore`]
//! capability instead of reaching for a global, so tests can hand them a
//! [`MemoryStore`].

use crate::error::{Result, SynthError};
use anyhow::Context;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub mod memory;
pub use memory::MemoryStore;

/// Storage keys. All values are strings.
pub mod keys {
    /// Bearer credential
    pub const SESSION_TOKEN: &str = "sessionToken";
    /// Serialized session metadata returned by login
    pub const USER_SESSION: &str = "userSession";
    /// Requests made on `LAST_REQUEST_DATE`, as a decimal integer
    pub const DAILY_REQUEST_COUNT: &str = "dailyRequestCount";
    /// Calendar day stamp of the last counted request
    pub const LAST_REQUEST_DATE: &str = "lastRequestDate";
}

/// Minimal key-value capability shared by the quota tracker and the gateway.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed persistent store
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open the store in the user's data directory.
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "synthdata", "synthdata")
            .ok_or_else(|| SynthError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("client.db"))
    }

    /// Open the store at an explicit path, creating parent directories.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthdata::storage::{KeyValueStore, SqliteStore};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = SqliteStore::new_with_path(dir.path().join("client.db")).unwrap();
    /// store.set("sessionToken", "abc").unwrap();
    /// assert_eq!(store.get("sessionToken").unwrap().as_deref(), Some("abc"));
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for database")
                    .map_err(|e| SynthError::Storage(e.to_string()))?;
            }
        }

        let store = Self { db_path };
        store.init()?;
        tracing::debug!("Opened client store at {}", store.db_path.display());
        Ok(store)
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| SynthError::Storage(e.to_string()).into())
    }

    fn init(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| SynthError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.open()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .context("Failed to read key")
            .map_err(|e| SynthError::Storage(e.to_string()))?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .context("Failed to write key")
        .map_err(|e| SynthError::Storage(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .context("Failed to delete key")
            .map_err(|e| SynthError::Storage(e.to_string()))?;
        Ok(())
    }
}
