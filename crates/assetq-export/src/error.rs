//! Error types for result export.

use thiserror::Error;

/// Errors that can occur while writing results.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error creating, opening, or writing the output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
