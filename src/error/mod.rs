//! Error handling for the ICD-9 classifier.
//!
//! Pattern matching and per-row classification never fail; the variants
//! below cover configuration problems (missing columns, bad taxonomy files)
//! and the I/O glue around the engine.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the classifier
#[derive(Debug, thiserror::Error)]
pub enum DxError {
    /// A required column is absent from the input schema
    #[error("Required column '{column}' not found in input schema")]
    ColumnNotFound { column: String },

    /// A column could not be interpreted as the expected type
    #[error("Column '{column}' has an invalid data type, expected {expected}")]
    InvalidDataType { column: String, expected: String },

    /// The taxonomy definition is inconsistent
    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    /// The file extension does not map to a supported table format
    #[error("Unsupported file format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Error building or converting Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error reading or writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding a taxonomy document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DxError {
    /// Shorthand for a missing column error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Shorthand for a taxonomy validation error
    pub fn taxonomy(message: impl Into<String>) -> Self {
        Self::Taxonomy(message.into())
    }
}

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, DxError>;
