// Namespaced key-value storage that the task store persists into

use crate::error::{Result, StoreError};
use std::collections::HashMap;

/// A string-keyed preference store grouped by namespace
///
/// Each `put_*` call replaces the previous value for that key as a single
/// atomic write. Reading a key that holds a value of the other type is a
/// [`StoreError::StorageRead`].
pub trait KeyValueStore {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>>;

    fn put_string(&mut self, namespace: &str, key: &str, value: &str) -> Result<()>;

    fn get_int(&self, namespace: &str, key: &str) -> Result<Option<i64>>;

    fn put_int(&mut self, namespace: &str, key: &str, value: i64) -> Result<()>;

    fn remove(&mut self, namespace: &str, key: &str) -> Result<()>;

    /// Block until every accepted write has reached the backing storage
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        (**self).get_string(namespace, key)
    }

    fn put_string(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        (**self).put_string(namespace, key, value)
    }

    fn get_int(&self, namespace: &str, key: &str) -> Result<Option<i64>> {
        (**self).get_int(namespace, key)
    }

    fn put_int(&mut self, namespace: &str, key: &str, value: i64) -> Result<()> {
        (**self).put_int(namespace, key, value)
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Result<()> {
        (**self).remove(namespace, key)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// A stored preference value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Text(String),
    Int(i64),
}

/// In-process store with no durability
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    values: HashMap<(String, String), StoredValue>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn lookup(&self, namespace: &str, key: &str) -> Option<&StoredValue> {
        self.values.get(&(namespace.to_string(), key.to_string()))
    }
}

impl KeyValueStore for MemoryKv {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        match self.lookup(namespace, key) {
            None => Ok(None),
            Some(StoredValue::Text(s)) => Ok(Some(s.clone())),
            Some(StoredValue::Int(_)) => Err(StoreError::read(key, "value is an integer, not a string")),
        }
    }

    fn put_string(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.values.insert(
            (namespace.to_string(), key.to_string()),
            StoredValue::Text(value.to_string()),
        );
        Ok(())
    }

    fn get_int(&self, namespace: &str, key: &str) -> Result<Option<i64>> {
        match self.lookup(namespace, key) {
            None => Ok(None),
            Some(StoredValue::Int(i)) => Ok(Some(*i)),
            Some(StoredValue::Text(_)) => Err(StoreError::read(key, "value is a string, not an integer")),
        }
    }

    fn put_int(&mut self, namespace: &str, key: &str, value: i64) -> Result<()> {
        self.values
            .insert((namespace.to_string(), key.to_string()), StoredValue::Int(value));
        Ok(())
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Result<()> {
        self.values.remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}
