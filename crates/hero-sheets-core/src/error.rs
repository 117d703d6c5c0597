//! Error types for hero-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing or persisting a sheet
///
/// Formula evaluation never fails; these cover structural problems only.
#[derive(Debug, Error)]
pub enum Error {
    /// Field index out of bounds
    #[error("Field index {0} out of bounds (count: {1})")]
    FieldOutOfBounds(usize, usize),

    /// Message addressed to a field of a different kind
    #[error("Cannot deliver {message} message to {field} field")]
    MessageMismatch {
        field: &'static str,
        message: &'static str,
    },

    /// Sheet could not be encoded or decoded
    #[error("Sheet serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
