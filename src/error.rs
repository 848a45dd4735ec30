// Error kinds surfaced by the task store and its storage backends

use thiserror::Error;

/// Boxed backend error so every `KeyValueStore` can report its own failures
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Stored task list is not a well-formed JSON array
    #[error("stored task list is not parseable")]
    Parse(#[source] serde_json::Error),

    #[error("failed to encode task list")]
    Encode(#[source] serde_json::Error),

    /// Index-based operation outside the current list bounds
    #[error("index {index} out of range for list of length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("failed to read key {key:?}")]
    StorageRead {
        key: String,
        #[source]
        source: BackendError,
    },

    #[error("failed to write key {key:?}")]
    StorageWrite {
        key: String,
        #[source]
        source: BackendError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn read(key: &str, source: impl Into<BackendError>) -> Self {
        StoreError::StorageRead {
            key: key.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn write(key: &str, source: impl Into<BackendError>) -> Self {
        StoreError::StorageWrite {
            key: key.to_string(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
