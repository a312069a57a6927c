// Persistent key-value storage abstraction
// Models the browser-origin-scoped store the session record lives in.

pub mod memory;
pub mod secure;

use async_trait::async_trait;

pub use memory::MemoryKeyValueStore;
pub use secure::SecureStorage;

/// Error type for storage operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    ConnectionError(String),
    SerializationError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            StorageError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Trait for persistent key-value stores.
///
/// Mirrors the surface of a browser-local store: string keys, string values,
/// one value per key. Implementations must tolerate removal of absent keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store a value under a key, replacing any existing value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Get the value stored under a key, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Remove the value stored under a key. Idempotent.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
