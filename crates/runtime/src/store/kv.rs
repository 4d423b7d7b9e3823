//! String key-value store boundary.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{StoreError, StoreResult};

/// Shared key-value store holding string values.
///
/// Every method is atomic with respect to the others on the same key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Writes `value` only when `key` is absent. Returns whether it was written.
    async fn set_if_absent(&self, key: &str, value: String) -> StoreResult<bool>;

    /// Replaces the value only while it still equals `expected`. Returns
    /// whether the swap happened; a missing key never matches.
    async fn compare_and_swap(&self, key: &str, expected: &str, value: String)
    -> StoreResult<bool>;

    /// Removes `key`. Returns whether it existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

/// In-memory implementation of KeyValueStore for tests and single-process runs.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: String) -> StoreResult<bool> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_owned(), value);
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &str,
        value: String,
    ) -> StoreResult<bool> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        match entries.get_mut(key) {
            Some(current) if current == expected => {
                *current = value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.remove(key).is_some())
    }
}
