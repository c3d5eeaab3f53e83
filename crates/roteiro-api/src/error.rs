//! Roteiro — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roteiro_core::error::DomainError;
use roteiro_navigation::NavigationError;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

/// Message shown to operators when a script reference dangles. Deliberately
/// generic: a dead end must read as a data problem for an administrator,
/// never as a crash.
const SCRIPT_UNAVAILABLE: &str = "script data unavailable, contact an administrator";

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around engine errors.
#[derive(Debug)]
pub enum ApiError {
    /// A repository/domain error.
    Domain(DomainError),
    /// A traversal error.
    Navigation(NavigationError),
    /// The operator session does not exist (expired or never created).
    SessionNotFound(Uuid),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<NavigationError> for ApiError {
    fn from(err: NavigationError) -> Self {
        Self::Navigation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            Self::Domain(err) => {
                let (status, code) = match err {
                    DomainError::StepNotFound(_) => (StatusCode::NOT_FOUND, "step_not_found"),
                    DomainError::ProductNotFound(_) => {
                        (StatusCode::NOT_FOUND, "product_not_found")
                    }
                    DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                    DomainError::Infrastructure(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
                    }
                };
                (status, code, err.to_string())
            }
            Self::Navigation(err) => match err {
                NavigationError::MissingProduct(_) => {
                    (StatusCode::NOT_FOUND, "product_not_found", err.to_string())
                }
                NavigationError::MissingStep(_) | NavigationError::NoEntryStep(_) => {
                    // The dangling id goes to the log, not to the operator.
                    warn!(%err, "script dead end");
                    (
                        StatusCode::NOT_FOUND,
                        "script_unavailable",
                        SCRIPT_UNAVAILABLE.to_owned(),
                    )
                }
                NavigationError::MissingButton(_) => {
                    (StatusCode::BAD_REQUEST, "unknown_button", err.to_string())
                }
                NavigationError::AtEnd => {
                    (StatusCode::CONFLICT, "script_ended", err.to_string())
                }
            },
            Self::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                format!("session not found: {id}"),
            ),
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
