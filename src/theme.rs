// Light/dark theme preference stored next to the task list

use crate::config::StoreKeys;
use crate::error::Result;
use crate::kv::KeyValueStore;
use tracing::{info, warn};

/// Night mode setting, stored with the platform's integer codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    FollowSystem,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_raw(self) -> i64 {
        match self {
            ThemeMode::FollowSystem => -1,
            ThemeMode::Light => 1,
            ThemeMode::Dark => 2,
        }
    }

    /// Unknown codes fall back to following the system
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => ThemeMode::Light,
            2 => ThemeMode::Dark,
            _ => ThemeMode::FollowSystem,
        }
    }

    /// Dark becomes light; light and follow-system become dark
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::FollowSystem => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Read the stored theme; missing or unreadable values mean follow-system
pub fn load_theme<K: KeyValueStore + ?Sized>(kv: &K, keys: &StoreKeys) -> ThemeMode {
    match kv.get_int(&keys.namespace, &keys.theme_key) {
        Ok(Some(raw)) => ThemeMode::from_raw(raw),
        Ok(None) => ThemeMode::default(),
        Err(e) => {
            warn!(key = %keys.theme_key, error = ?e, "Failed to read theme preference");
            ThemeMode::default()
        }
    }
}

pub fn save_theme<K: KeyValueStore + ?Sized>(kv: &mut K, keys: &StoreKeys, mode: ThemeMode) -> Result<()> {
    kv.put_int(&keys.namespace, &keys.theme_key, mode.as_raw())?;
    info!(theme = %mode, "Saved theme preference");
    Ok(())
}

/// Flip between light and dark and persist the result
pub fn toggle_theme<K: KeyValueStore + ?Sized>(kv: &mut K, keys: &StoreKeys) -> Result<ThemeMode> {
    let mode = load_theme(&*kv, keys).toggled();
    save_theme(kv, keys, mode)?;
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    #[test]
    fn test_missing_theme_follows_system() {
        let kv = MemoryKv::new();
        assert_eq!(load_theme(&kv, &StoreKeys::default()), ThemeMode::FollowSystem);
    }

    #[test]
    fn test_toggle_sequence() {
        let mut kv = MemoryKv::new();
        let keys = StoreKeys::default();

        assert_eq!(toggle_theme(&mut kv, &keys).unwrap(), ThemeMode::Dark);
        assert_eq!(toggle_theme(&mut kv, &keys).unwrap(), ThemeMode::Light);
        assert_eq!(toggle_theme(&mut kv, &keys).unwrap(), ThemeMode::Dark);
        assert_eq!(kv.get_int("TodoPrefs", "themePref").unwrap(), Some(2));
    }

    #[test]
    fn test_raw_codes() {
        assert_eq!(ThemeMode::from_raw(-1), ThemeMode::FollowSystem);
        assert_eq!(ThemeMode::from_raw(1), ThemeMode::Light);
        assert_eq!(ThemeMode::from_raw(2), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_raw(0), ThemeMode::FollowSystem);
        assert_eq!(ThemeMode::Light.as_raw(), 1);
    }

    #[test]
    fn test_theme_does_not_touch_tasks_key() {
        let mut kv = MemoryKv::new();
        let keys = StoreKeys::default();
        kv.put_string(&keys.namespace, &keys.tasks_key, "[]").unwrap();

        save_theme(&mut kv, &keys, ThemeMode::Light).unwrap();

        assert_eq!(kv.get_string("TodoPrefs", "tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(load_theme(&kv, &keys), ThemeMode::Light);
    }

    #[test]
    fn test_unreadable_theme_falls_back() {
        let mut kv = MemoryKv::new();
        let keys = StoreKeys::default();
        kv.put_string(&keys.namespace, &keys.theme_key, "dark").unwrap();
        assert_eq!(load_theme(&kv, &keys), ThemeMode::FollowSystem);
    }
}
