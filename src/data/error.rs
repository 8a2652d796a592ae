use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure while reading the emission table. No partial dataset
/// survives one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("invalid table layout: {0}")]
    Layout(String),

    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
}
