//! CSV table operations
//!
//! Input CSV files are read with every column typed as `Utf8`. Identifiers
//! and dates are passed to the output verbatim, and code lists are never
//! re-formatted through a numeric type on the way in.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use super::Table;
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::error::util::{safe_create_file, safe_open_file};
use crate::utils::logging::{Transfer, log_transfer_complete, log_transfer_start};

/// Read a CSV file with a header row, typing every column as text
pub fn read_csv_as_text(path: &Path, config: &ReaderConfig) -> Result<Table> {
    let start = Instant::now();
    log_transfer_start(Transfer::Read, "CSV", path);

    let header_file = safe_open_file(path, "input table header")?;
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(header_file, Some(0))?;

    let schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let file = safe_open_file(path, "input table")?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(config.batch_size)
        .with_truncated_rows(true)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<RecordBatch>, ArrowError>>()?;
    let table = Table::new(schema, batches);

    log_transfer_complete(Transfer::Read, path, table.num_rows(), start.elapsed());
    Ok(table)
}

/// Write a table as CSV with a header row
///
/// A table without batches still gets its header line.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let start = Instant::now();
    log_transfer_start(Transfer::Write, "CSV", path);

    let file = safe_create_file(path, "output table")?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);

    if table.batches.is_empty() {
        writer.write(&RecordBatch::new_empty(table.schema.clone()))?;
    }
    for batch in &table.batches {
        writer.write(batch)?;
    }

    log_transfer_complete(Transfer::Write, path, table.num_rows(), start.elapsed());
    Ok(())
}
