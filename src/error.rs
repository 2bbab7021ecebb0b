//! Error handling for XCSV reading and writing.
//!
//! Provides error types with enough context (line number and content) to
//! locate a defect in the source file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XcsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Malformed header line {line_number}: '{line}' does not continue any key")]
    MalformedHeaderLine { line_number: usize, line: String },

    #[error("Data row at line {line_number} has {found} fields, expected {expected}")]
    ColumnCountMismatch {
        line_number: usize,
        expected: usize,
        found: usize,
    },

    #[error("No column header row found after the extended header section")]
    MissingColumnHeaders,

    #[error("Column headers do not match data columns: {reason}")]
    ColumnHeaderMismatch { reason: String },

    #[error("Invalid header key: '{key}'")]
    InvalidHeaderKey { key: String },

    #[error("Invalid value for header key '{key}': {reason}")]
    InvalidHeaderValue { key: String, reason: String },

    #[error("Unknown column: '{label}'")]
    UnknownColumn { label: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, XcsvError>;
