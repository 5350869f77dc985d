//! Core error type shared by the record books, the office and the helpers.

use thiserror::Error;

use crate::db::DbError;

/// Errors surfaced by core operations.
///
/// `Validation` and `NotFound` abort the operation with state unchanged.
/// `Persistence` reports a failed load or save; a mutation that was already
/// applied in memory stays applied.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] DbError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Validation error for a required field that was missing or blank.
    pub fn missing(field: &str) -> Self {
        CoreError::Validation(format!("{} is required", field))
    }
}
