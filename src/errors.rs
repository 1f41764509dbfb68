use serde::Serialize;
use thiserror::Error;

/// Errors returned by the picking services.
///
/// Business conditions are not errors here: missing stock, zero-quantity
/// lines, and empty inputs all come back as warnings or empty results.
/// Only malformed input aborts a run.
#[derive(Debug, Error, Serialize)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(errors.to_string())
    }
}
