//! Error types for chart-oxide
//!
//! Structured error handling using thiserror. Errors are reserved for
//! genuine failures (file I/O, malformed data files, bad table shapes);
//! routine data conditions such as missing values, unconfigured axes, or
//! unbinned cases are modeled as `Option`/empty results, never as errors.

use thiserror::Error;

/// Main error type for chart-oxide operations
#[derive(Error, Debug)]
pub enum ChartError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Unsupported file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Column not found in data
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Invalid column index
    #[error("Invalid column index: {index} (available: {max})")]
    InvalidColumnIndex { index: usize, max: usize },

    /// Row width does not match the table's attribute count
    #[error("Row has {actual} values, table has {expected} attributes")]
    RowWidthMismatch { expected: usize, actual: usize },

    /// Case identity not present in the table
    #[error("Unknown case id: {0}")]
    UnknownCase(u64),

    /// Data validation error
    #[error("Data validation failed: {0}")]
    Validation(String),
}

/// Result type alias for chart-oxide operations
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ChartError::ColumnNotFound {
            column: "Species".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'Species' not found in dataset");

        let err = ChartError::RowWidthMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Row has 2 values, table has 3 attributes");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let chart_err: ChartError = io_err.into();
        assert!(matches!(chart_err, ChartError::FileIo(_)));
    }
}
