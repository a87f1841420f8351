//! Error type for the HTTP boundary.

use std::collections::BTreeMap;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::repository::RepositoryError;

use super::response;

/// Field name → list of violation messages, ordered for deterministic
/// output.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub enum ApiError {
    /// Lookup by id failed. Carries the fixed user-facing message.
    NotFound(&'static str),
    /// Malformed input, with field-level detail.
    Validation(ValidationErrors),
    /// Repository failure (storage I/O, poisoned lock).
    Repository(RepositoryError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(message) => write!(f, "{}", message),
            ApiError::Validation(errors) => {
                write!(f, "validation failed for {} field(s)", errors.len())
            }
            ApiError::Repository(e) => write!(f, "repository error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Repository(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Repository(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => response::error(StatusCode::NOT_FOUND, message),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "status": "error",
                    "message": "Validation failed.",
                    "errors": errors,
                })),
            )
                .into_response(),
            ApiError::Repository(e) => {
                tracing::error!(error = %e, "request failed in the repository");
                response::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        }
    }
}
