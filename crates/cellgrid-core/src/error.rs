//! Error types for cellgrid-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellgrid-core
///
/// Only parsing, option validation and name definition can fail. Store reads and writes
/// outside the sheet bounds are silently ignored, and a reference deleted by a structural
/// edit is reported as `None` rather than as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u16),

    /// Invalid store options
    #[error("Invalid store options: {0}")]
    InvalidOptions(String),

    /// Invalid defined name
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Defined name already present in the same scope
    #[error("Name already exists in this scope: {0}")]
    DuplicateName(String),
}
