//! SQLite-backed `StoragePort`.
//!
//! One row per document in the `documents` table; the body column holds the
//! serialized JSON. The schema lives in the workspace `migrations/`
//! directory.

use async_trait::async_trait;
use sqlx::SqlitePool;

use roteiro_core::storage::{StorageError, StoragePort};

/// SQLite-backed document store.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Creates a new `SqliteStorage` over an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoragePort for SqliteStorage {
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO documents (doc_key, body, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(doc_key) DO UPDATE
             SET body = excluded.body, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value.to_string())
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE doc_key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        body.map(|body| {
            serde_json::from_str(&body).map_err(|error| {
                StorageError::Backend(format!("document {key} is not valid JSON: {error}"))
            })
        })
        .transpose()
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM documents WHERE doc_key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

fn backend(error: sqlx::Error) -> StorageError {
    StorageError::Backend(error.to_string())
}
