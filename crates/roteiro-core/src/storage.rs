//! Storage port abstraction.
//!
//! The engine never checks what environment it runs in; everything below
//! the synchronization layer goes through this port, so tests run against
//! an in-memory implementation and production against a persistent one.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused the write because a size/quota limit was hit.
    /// Affects the offending key only; other writes must proceed.
    #[error("storage quota exceeded writing key {key}")]
    QuotaExceeded {
        /// The key whose write was rejected.
        key: String,
    },

    /// Any other backend failure (connection, I/O, corruption).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Port for a key → JSON document store.
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Persist `value` under `key`, replacing any previous document.
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError>;

    /// Load the document stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Remove the document stored under `key`. Removing a missing key is
    /// not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
