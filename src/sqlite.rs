// Durable key-value store on a single SQLite file

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::models::now_ms;
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Database file created inside the data directory
pub const DB_FILE: &str = "todolist.db";

/// Preferences table keyed by (namespace, key)
///
/// A value lives in exactly one of `value_text` / `value_int`. Every put is a
/// single `INSERT OR REPLACE`, so a crash leaves either the old or the new
/// value behind.
pub struct SqliteKv {
    path: Option<PathBuf>,
    db: Connection,
}

impl SqliteKv {
    /// Open or create `todolist.db` inside the given directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let db_path = dir.join(DB_FILE);
        let db = Connection::open(&db_path)?;
        info!(path = ?db_path, "Opened preference database");

        let store = Self {
            path: Some(db_path),
            db,
        };
        store.create_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            path: None,
            db: Connection::open_in_memory()?,
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating preferences schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value_text TEXT,
                value_int INTEGER,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (namespace, key)
            );
            "#,
        )?;

        Ok(())
    }

    fn lookup(&self, namespace: &str, key: &str) -> Result<Option<(Option<String>, Option<i64>)>> {
        self.db
            .query_row(
                "SELECT value_text, value_int FROM preferences WHERE namespace = ?1 AND key = ?2",
                rusqlite::params![namespace, key],
                |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<i64>>(1)?)),
            )
            .optional()
            .map_err(|e| StoreError::read(key, e))
    }
}

impl KeyValueStore for SqliteKv {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        match self.lookup(namespace, key)? {
            None => Ok(None),
            Some((Some(text), _)) => Ok(Some(text)),
            Some((None, _)) => Err(StoreError::read(key, "value is an integer, not a string")),
        }
    }

    fn put_string(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO preferences (namespace, key, value_text, value_int, updated_at)
                 VALUES (?1, ?2, ?3, NULL, ?4)",
                rusqlite::params![namespace, key, value, now_ms()],
            )
            .map_err(|e| StoreError::write(key, e))?;
        debug!(namespace, key, bytes = value.len(), "Stored string preference");
        Ok(())
    }

    fn get_int(&self, namespace: &str, key: &str) -> Result<Option<i64>> {
        match self.lookup(namespace, key)? {
            None => Ok(None),
            Some((_, Some(value))) => Ok(Some(value)),
            Some((_, None)) => Err(StoreError::read(key, "value is a string, not an integer")),
        }
    }

    fn put_int(&mut self, namespace: &str, key: &str, value: i64) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO preferences (namespace, key, value_text, value_int, updated_at)
                 VALUES (?1, ?2, NULL, ?3, ?4)",
                rusqlite::params![namespace, key, value, now_ms()],
            )
            .map_err(|e| StoreError::write(key, e))?;
        debug!(namespace, key, value, "Stored integer preference");
        Ok(())
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Result<()> {
        self.db
            .execute(
                "DELETE FROM preferences WHERE namespace = ?1 AND key = ?2",
                rusqlite::params![namespace, key],
            )
            .map_err(|e| StoreError::write(key, e))?;
        Ok(())
    }
}
