//! Parquet table operations

use std::path::Path;
use std::time::Instant;

use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::Table;
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::error::util::{safe_create_file, safe_open_file};
use crate::utils::logging::{Transfer, log_transfer_complete, log_transfer_start};

/// Read a Parquet file into Arrow record batches
pub fn read_parquet(path: &Path, config: &ReaderConfig) -> Result<Table> {
    let start = Instant::now();
    log_transfer_start(Transfer::Read, "Parquet", path);

    let file = safe_open_file(path, "input table")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.with_batch_size(config.batch_size).build()?;

    let batches = reader.collect::<std::result::Result<Vec<RecordBatch>, ArrowError>>()?;
    let table = Table::new(schema, batches);

    log_transfer_complete(Transfer::Read, path, table.num_rows(), start.elapsed());
    Ok(table)
}

/// Write a table as a single Parquet file
pub fn write_parquet(path: &Path, table: &Table) -> Result<()> {
    let start = Instant::now();
    log_transfer_start(Transfer::Write, "Parquet", path);

    let file = safe_create_file(path, "output table")?;
    let mut writer = ArrowWriter::try_new(file, table.schema.clone(), None)?;
    for batch in &table.batches {
        writer.write(batch)?;
    }
    writer.close()?;

    log_transfer_complete(Transfer::Write, path, table.num_rows(), start.elapsed());
    Ok(())
}
