// Configuration: storage location and key layout

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file looked up inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Where the store keeps its values inside the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    pub namespace: String,
    pub tasks_key: String,
    pub theme_key: String,
    pub undo_key: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            namespace: "TodoPrefs".to_string(),
            tasks_key: "tasks".to_string(),
            theme_key: "themePref".to_string(),
            undo_key: "lastDeleted".to_string(),
        }
    }
}

impl StoreKeys {
    /// Keys must be non-empty and distinct so sibling values never collide
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(StoreError::Config("namespace cannot be empty".to_string()));
        }

        let keys = [
            ("tasks_key", &self.tasks_key),
            ("theme_key", &self.theme_key),
            ("undo_key", &self.undo_key),
        ];

        for (name, key) in keys {
            if key.trim().is_empty() {
                return Err(StoreError::Config(format!("{} cannot be empty", name)));
            }
        }

        for (i, (name, key)) in keys.iter().enumerate() {
            for (other_name, other) in &keys[i + 1..] {
                if key == other {
                    return Err(StoreError::Config(format!(
                        "{} and {} both use key {:?}",
                        name, other_name, key
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the database; falls back to the platform data dir
    pub data_dir: Option<PathBuf>,

    #[serde(flatten)]
    pub keys: StoreKeys,

    /// Persist on a worker thread instead of inline
    pub background_save: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            keys: StoreKeys::default(),
            background_save: false,
        }
    }
}

impl Config {
    /// Platform default, e.g. `~/.local/share/todolist`
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todolist")
    }

    /// Load from an explicit file, or `<data_dir>/config.yaml` if present
    ///
    /// An explicit path must exist. Without one, a missing file yields the
    /// defaults. `data_dir_override` wins over whatever the file says.
    pub fn load(explicit: Option<&Path>, data_dir_override: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let dir = data_dir_override
                    .map(Path::to_path_buf)
                    .unwrap_or_else(Self::default_data_dir);
                let candidate = dir.join(CONFIG_FILE);
                if candidate.exists() {
                    Self::from_file(&candidate)?
                } else {
                    debug!(path = ?candidate, "No config file, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(dir) = data_dir_override {
            config.data_dir = Some(dir.to_path_buf());
        }

        config.keys.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        info!(path = ?path, "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(Self::default_data_dir)
    }
}
