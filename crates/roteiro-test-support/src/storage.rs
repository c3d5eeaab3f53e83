//! Test storage — mock `StoragePort` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use roteiro_core::storage::{StorageError, StoragePort};

/// An in-memory key → document store. The default backend for unit and
/// integration tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with documents.
    #[must_use]
    pub fn with_documents(documents: Vec<(&str, serde_json::Value)>) -> Self {
        Self {
            documents: Mutex::new(
                documents
                    .into_iter()
                    .map(|(key, value)| (key.to_owned(), value))
                    .collect(),
            ),
        }
    }

    /// Returns a snapshot of the stored document for `key`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn document(&self, key: &str) -> Option<serde_json::Value> {
        self.documents.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.documents.lock().unwrap().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.documents.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A storage port that records every `put` call in order, for asserting on
/// write coalescing. Reads always return `None`.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    puts: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingStorage {
    /// Create a new recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded `put` calls in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn puts(&self) -> Vec<(String, serde_json::Value)> {
        self.puts.lock().unwrap().clone()
    }

    /// Returns the recorded `put` calls for one key, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn puts_for(&self, key: &str) -> Vec<serde_json::Value> {
        self.puts
            .lock()
            .unwrap()
            .iter()
            .filter(|(put_key, _)| put_key == key)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

#[async_trait]
impl StoragePort for RecordingStorage {
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_owned(), value.clone()));
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(None)
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A storage port that always fails. Useful for testing error-handling
/// paths.
#[derive(Debug)]
pub struct FailingStorage;

#[async_trait]
impl StoragePort for FailingStorage {
    async fn put(&self, _key: &str, _value: &serde_json::Value) -> Result<(), StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }
}

/// A storage port that rejects writes to one key with `QuotaExceeded` and
/// records successful writes to every other key. Models the "one key over
/// quota must not abort the rest of the flush" contract.
#[derive(Debug)]
pub struct QuotaStorage {
    full_key: String,
    inner: RecordingStorage,
}

impl QuotaStorage {
    /// Create a store where writes to `full_key` exceed quota.
    #[must_use]
    pub fn new(full_key: &str) -> Self {
        Self {
            full_key: full_key.to_owned(),
            inner: RecordingStorage::new(),
        }
    }

    /// Returns the successful `put` calls in call order.
    pub fn puts(&self) -> Vec<(String, serde_json::Value)> {
        self.inner.puts()
    }
}

#[async_trait]
impl StoragePort for QuotaStorage {
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        if key == self.full_key {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
            });
        }
        self.inner.put(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        self.inner.get(key).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}
