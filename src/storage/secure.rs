// Obfuscating wrapper over a key-value store
// Values are JSON-serialized then base64-encoded. The encoding is reversible
// and provides obfuscation only, not confidentiality or tamper resistance.

use super::{KeyValueStore, StorageError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Key-value store wrapper that persists values as opaque-looking blobs.
#[derive(Clone)]
pub struct SecureStorage {
    store: Arc<dyn KeyValueStore>,
}

impl SecureStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Serialize and store a value under a key.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::SerializationError(format!("Failed to serialize: {}", e)))?;
        let encoded = STANDARD.encode(json.as_bytes());
        self.store.set_item(key, &encoded).await
    }

    /// Read and decode a stored value.
    ///
    /// Decode and parse failures are swallowed: the corrupt entry is cleared
    /// and `None` is returned, so callers see corruption as an absent value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(encoded) = self.store.get_item(key).await? else {
            return Ok(None);
        };

        match decode_value(&encoded) {
            Some(value) => Ok(Some(value)),
            None => {
                warn!("Discarding undecodable entry under key '{}'", key);
                self.store.remove_item(key).await?;
                Ok(None)
            }
        }
    }

    /// Remove a stored value. Idempotent.
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove_item(key).await
    }
}

fn decode_value<T: DeserializeOwned>(encoded: &str) -> Option<T> {
    let bytes = STANDARD.decode(encoded).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    serde_json::from_str(&json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Payload {
        name: String,
        count: u32,
    }

    fn secure_store() -> (Arc<MemoryKeyValueStore>, SecureStorage) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let storage = SecureStorage::new(kv.clone());
        (kv, storage)
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let (_, storage) = secure_store();

        let payload = Payload {
            name: "tour".to_string(),
            count: 3,
        };
        storage.set("slot", &payload).await.unwrap();

        let read: Option<Payload> = storage.get("slot").await.unwrap();
        assert_eq!(read, Some(payload));
    }

    #[tokio::test]
    async fn test_stored_value_is_not_plaintext() {
        let (kv, storage) = secure_store();

        let payload = Payload {
            name: "tour".to_string(),
            count: 3,
        };
        storage.set("slot", &payload).await.unwrap();

        let raw = kv.get_item("slot").await.unwrap().unwrap();
        assert!(!raw.contains("tour"));
        // Reversible: decoding the blob yields the JSON back.
        let decoded = STANDARD.decode(&raw).unwrap();
        assert!(String::from_utf8(decoded).unwrap().contains("tour"));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_swallowed_and_cleared() {
        let (kv, storage) = secure_store();

        kv.set_item("slot", "%%% not base64 %%%").await.unwrap();

        let read: Option<Payload> = storage.get("slot").await.unwrap();
        assert_eq!(read, None);
        // Corrupt slot was purged.
        assert_eq!(kv.get_item("slot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_valid_base64_invalid_json_is_swallowed() {
        let (kv, storage) = secure_store();

        let garbage = STANDARD.encode(b"{\"name\":");
        kv.set_item("slot", &garbage).await.unwrap();

        let read: Option<Payload> = storage.get("slot").await.unwrap();
        assert_eq!(read, None);
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let (_, storage) = secure_store();
        let read: Option<Payload> = storage.get("missing").await.unwrap();
        assert_eq!(read, None);
    }
}
