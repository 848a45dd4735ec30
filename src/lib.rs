// todolist - Ordered task list persisted as JSON in a namespaced key-value store

pub mod background;
pub mod codec;
pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod sqlite;
pub mod store;
pub mod theme;

// Re-export main types for convenience
pub use background::BackgroundKv;
pub use config::{Config, StoreKeys};
pub use error::{Result, StoreError};
pub use kv::{KeyValueStore, MemoryKv};
pub use models::{DEFAULT_TAG, Priority, Task, now_ms};
pub use sqlite::SqliteKv;
pub use store::{DeletedTask, TaskStore};
pub use theme::ThemeMode;

// Re-export rusqlite for callers that want to inspect the database
pub use rusqlite;
