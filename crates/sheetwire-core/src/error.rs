//! Error types for sheetwire-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetwire-core
#[derive(Debug, Error)]
pub enum Error {
    /// Column letters, column number or A1 reference could not be decoded
    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    /// Coordinate lies outside the worksheet's declared grid
    #[error("Cell ({row}, {col}) out of bounds, sheet is {row_count} by {column_count}")]
    OutOfBounds {
        row: u32,
        col: u32,
        row_count: u32,
        column_count: u32,
    },

    /// Coordinate is inside the grid but was never fetched
    #[error("Cell {0} has not been loaded yet")]
    NotLoaded(String),

    /// Value cannot be written to a cell
    #[error("Invalid value type: {0}")]
    InvalidValueType(String),

    /// Formula text does not start with '='
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    /// Cell has a local edit that has not been saved yet
    #[error("Cell {0} has unsaved changes; save or discard them first")]
    UnsavedChangesPending(String),

    /// Payload could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed-reference error with a message
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Error::MalformedReference(msg.into())
    }
}
