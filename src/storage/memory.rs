// In-memory key-value store implementation

use super::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory key-value store backed by a `HashMap`.
///
/// Stands in for the browser-local store in tests and local development.
pub struct MemoryKeyValueStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_item() {
        let store = MemoryKeyValueStore::new();

        store.set_item("key1", "value1").await.unwrap();

        let value = store.get_item("key1").await.unwrap();
        assert_eq!(value, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_item_returns_none() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get_item("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let store = MemoryKeyValueStore::new();

        store.set_item("key1", "old").await.unwrap();
        store.set_item("key1", "new").await.unwrap();

        assert_eq!(store.get_item("key1").await.unwrap(), Some("new".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_item_is_idempotent() {
        let store = MemoryKeyValueStore::new();

        store.set_item("key1", "value1").await.unwrap();
        store.remove_item("key1").await.unwrap();
        store.remove_item("key1").await.unwrap();

        assert_eq!(store.get_item("key1").await.unwrap(), None);
    }
}
