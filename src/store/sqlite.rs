/*!
 * SQLite-backed key-value store.
 *
 * One table of `(key, JSON text, updated_at)` rows. Queries run on the
 * blocking pool through `spawn_blocking` so the async runtime never waits
 * on disk I/O.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::KeyValueStore;
use crate::errors::StoreError;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "linguacue.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "linguacue";

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// `KeyValueStore` persisted in a SQLite file
#[derive(Clone)]
pub struct SqliteStore {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open the store at the default location
    pub fn new_default() -> Result<Self> {
        let db_path = Self::default_database_path()?;
        Self::new(&db_path)
    }

    /// Open (or create) the store at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening learner store at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;
        initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory learner store");

        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run a query on the blocking pool
    async fn execute_async<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Backend(format!("Failed to acquire database lock: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("Database task panicked: {}", e)))?
    }
}

/// Create the key-value table if it does not exist yet
fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("Failed to enable WAL mode")?;
    conn.execute_batch(CREATE_TABLE_SQL)
        .context("Failed to create kv_store table")?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let key = key.to_string();
        self.execute_async(move |conn| {
            let raw: Option<String> = conn
                .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0))
                .optional()?;
            raw.map(|text| serde_json::from_str(&text).map_err(StoreError::from))
                .transpose()
        })
        .await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let key = key.to_string();
        let text = serde_json::to_string(&value)?;
        self.execute_async(move |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, text],
            )?;
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.execute_async(|conn| {
            conn.execute("DELETE FROM kv_store", [])?;
            Ok(())
        })
        .await
    }
}
