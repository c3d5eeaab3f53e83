//! Domain error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A step was not found in the repository.
    #[error("step not found: {0}")]
    StepNotFound(String),

    /// A product was not found in the repository.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        Self::Infrastructure(err.to_string())
    }
}
