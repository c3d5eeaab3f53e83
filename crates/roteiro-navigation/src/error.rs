//! Navigation error types.

use roteiro_script::{ButtonId, ProductId, StepId};
use thiserror::Error;

/// Errors surfaced while traversing a script.
///
/// Referential integrity is validated lazily: a button may point at a step
/// deleted long after the link was authored, and that only shows up here,
/// at traversal time, as a recoverable error the caller turns into a
/// dead-end screen.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The product does not exist.
    #[error("product not found: {0}")]
    MissingProduct(ProductId),

    /// The product has no entry step configured.
    #[error("product {0} has no entry step configured")]
    NoEntryStep(ProductId),

    /// A step referenced by the script does not exist.
    #[error("script step not found: {0}")]
    MissingStep(StepId),

    /// The clicked button does not exist on the current step.
    #[error("button not found on current step: {0}")]
    MissingButton(ButtonId),

    /// The session already reached the call-closing state.
    #[error("the script has already reached its end")]
    AtEnd,
}
