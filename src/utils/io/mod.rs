//! IO utilities for input and output tables
//!
//! Tables are read fully into memory as Arrow record batches and written
//! back in one pass. The format follows the file extension.

pub mod csv;
pub mod parquet;

use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::config::ReaderConfig;
use crate::error::{DxError, Result};
use crate::utils::logging::log_table_warning;

/// Supported on-disk table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl TableFormat {
    /// Detect the format from a file extension (case-insensitive)
    ///
    /// # Errors
    /// Returns [`DxError::UnsupportedFormat`] for any other extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet" | "pq") => Ok(Self::Parquet),
            _ => Err(DxError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// An in-memory table: a schema plus zero or more batches sharing it
#[derive(Debug, Clone)]
pub struct Table {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl Table {
    #[must_use]
    pub const fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    /// Total number of rows across batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

/// Read a table, choosing the reader from the file extension
pub fn read_table(path: &Path, config: &ReaderConfig) -> Result<Table> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Csv => csv::read_csv_as_text(path, config)?,
        TableFormat::Parquet => parquet::read_parquet(path, config)?,
    };

    if table.num_rows() == 0 {
        log_table_warning("Input table has no rows", path);
    }
    Ok(table)
}

/// Write a table, choosing the writer from the file extension
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => csv::write_csv(path, table),
        TableFormat::Parquet => parquet::write_parquet(path, table),
    }
}
