//! Batch classification over Arrow record batches
//!
//! Input batches must carry the identifier, raw code-list and date columns
//! named in [`ClassifierConfig`]. The output batch holds, in order:
//!
//! 1. the identifier column, passed through unchanged
//! 2. the composite flag (`MACE` in the reference taxonomy)
//! 3. the date column, passed through unchanged
//! 4. one `Int32` 0/1 column per category, in taxonomy order
//!
//! Rows are independent. Large batches are spread over the rayon pool and
//! collected back by row index, so output row `i` always belongs to input
//! row `i`.

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, ArrayRef, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use super::classifier::{ClassificationResult, classify};
use super::taxonomy::Taxonomy;
use super::tokenizer::tokenize_with_config;
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::utils::arrow::array_utils::{
    as_string_array, column_as_utf8, get_column_by_name, require_columns,
};

/// Counts gathered while classifying
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows classified
    pub rows: usize,
    /// Rows with at least one category flag set
    pub rows_with_match: usize,
    /// Rows whose code list was null, blank or a missing-value marker
    pub rows_without_codes: usize,
    /// Rows with the composite flag set
    pub composite_hits: usize,
    /// Rows flagged per category, in taxonomy order
    pub category_hits: Vec<usize>,
}

impl BatchSummary {
    fn new(categories: usize) -> Self {
        Self {
            category_hits: vec![0; categories],
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: &RowOutcome) {
        self.rows += 1;
        if outcome.without_codes {
            self.rows_without_codes += 1;
        }
        if !outcome.result.is_empty() {
            self.rows_with_match += 1;
        }
        if outcome.result.composite() {
            self.composite_hits += 1;
        }
        for (hits, flag) in self.category_hits.iter_mut().zip(outcome.result.flags()) {
            *hits += usize::from(*flag);
        }
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: &Self) {
        self.rows += other.rows;
        self.rows_with_match += other.rows_with_match;
        self.rows_without_codes += other.rows_without_codes;
        self.composite_hits += other.composite_hits;
        if self.category_hits.len() < other.category_hits.len() {
            self.category_hits.resize(other.category_hits.len(), 0);
        }
        for (hits, other_hits) in self.category_hits.iter_mut().zip(&other.category_hits) {
            *hits += other_hits;
        }
    }

    /// The `n` most frequently flagged categories, ties in taxonomy order
    #[must_use]
    pub fn top_categories<'t>(&self, taxonomy: &'t Taxonomy, n: usize) -> Vec<(&'t str, usize)> {
        taxonomy
            .category_names()
            .zip(self.category_hits.iter().copied())
            .filter(|(_, hits)| *hits > 0)
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n)
            .collect()
    }
}

/// One row's classification, plus whether the row had any codes at all
#[derive(Debug, Clone)]
struct RowOutcome {
    result: ClassificationResult,
    without_codes: bool,
}

fn classify_row(
    codes: Option<&StringArray>,
    row: usize,
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> RowOutcome {
    let raw = codes.and_then(|array| (!array.is_null(row)).then(|| array.value(row)));
    let tokens = tokenize_with_config(raw, config);
    RowOutcome {
        without_codes: tokens.is_empty(),
        result: classify(tokens.as_slice(), taxonomy),
    }
}

/// Check that the required columns are present before touching any row
///
/// # Errors
/// Returns [`crate::DxError::ColumnNotFound`] naming the first absent column.
pub fn validate_input_schema(schema: &Schema, config: &ClassifierConfig) -> Result<()> {
    require_columns(schema, &config.required_columns())
}

/// Schema of the classified output for a given input schema
pub fn output_schema(
    input: &Schema,
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> Result<SchemaRef> {
    validate_input_schema(input, config)?;

    let id_field = input.field_with_name(&config.id_column)?.clone();
    let date_field = input.field_with_name(&config.date_column)?.clone();

    let mut fields = Vec::with_capacity(taxonomy.len() + 3);
    fields.push(id_field);
    fields.push(Field::new(taxonomy.composite().name(), DataType::Int32, false));
    fields.push(date_field);
    fields.extend(
        taxonomy
            .category_names()
            .map(|name| Field::new(name, DataType::Int32, false)),
    );

    Ok(Arc::new(Schema::new(fields)))
}

fn classify_rows(
    codes: Option<&StringArray>,
    num_rows: usize,
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> Vec<RowOutcome> {
    if config.parallel && num_rows >= config.parallel_threshold.max(1) {
        debug!(
            "Classifying {num_rows} rows on {} threads",
            rayon::current_num_threads()
        );
        (0..num_rows)
            .into_par_iter()
            .map(|row| classify_row(codes, row, taxonomy, config))
            .collect()
    } else {
        (0..num_rows)
            .map(|row| classify_row(codes, row, taxonomy, config))
            .collect()
    }
}

/// Classify one batch and report what was found
pub fn classify_batch_with_summary(
    batch: &RecordBatch,
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> Result<(RecordBatch, BatchSummary)> {
    let schema = output_schema(&batch.schema(), taxonomy, config)?;

    let ids = get_column_by_name(batch, &config.id_column)?;
    let dates = get_column_by_name(batch, &config.date_column)?;
    let raw_codes = get_column_by_name(batch, &config.codes_column)?;

    let codes = column_as_utf8(&raw_codes, &config.codes_column);
    let codes = codes
        .as_ref()
        .map(|array| as_string_array(array, &config.codes_column))
        .transpose()?;

    let outcomes = classify_rows(codes, batch.num_rows(), taxonomy, config);

    let mut summary = BatchSummary::new(taxonomy.len());
    for outcome in &outcomes {
        summary.record(outcome);
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(taxonomy.len() + 3);
    columns.push(ids);
    columns.push(Arc::new(Int32Array::from_iter_values(
        outcomes.iter().map(|o| o.result.composite_value()),
    )));
    columns.push(dates);
    for idx in 0..taxonomy.len() {
        columns.push(Arc::new(Int32Array::from_iter_values(
            outcomes
                .iter()
                .map(|o| i32::from(o.result.flags()[idx])),
        )));
    }

    let output = RecordBatch::try_new(schema, columns)?;
    Ok((output, summary))
}

/// Classify one batch
pub fn classify_batch(
    batch: &RecordBatch,
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> Result<RecordBatch> {
    classify_batch_with_summary(batch, taxonomy, config).map(|(output, _)| output)
}

/// Classify a whole dataset, validating every batch's schema first
///
/// No batch is classified if any batch lacks a required column.
pub fn classify_batches_with_summary(
    batches: &[RecordBatch],
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> Result<(Vec<RecordBatch>, BatchSummary)> {
    for batch in batches {
        validate_input_schema(&batch.schema(), config)?;
    }

    let start = Instant::now();
    let mut summary = BatchSummary::new(taxonomy.len());
    let mut outputs = Vec::with_capacity(batches.len());

    for (i, batch) in batches.iter().enumerate() {
        let (output, batch_summary) = classify_batch_with_summary(batch, taxonomy, config)?;
        debug!(
            "Batch {i}: {} rows, {} with matches",
            batch_summary.rows, batch_summary.rows_with_match
        );
        summary.merge(&batch_summary);
        outputs.push(output);
    }

    info!(
        "Classified {} rows in {} batches against {} categories in {:?}",
        summary.rows,
        batches.len(),
        taxonomy.len(),
        start.elapsed()
    );

    Ok((outputs, summary))
}

/// Classify a whole dataset
pub fn classify_batches(
    batches: &[RecordBatch],
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> Result<Vec<RecordBatch>> {
    classify_batches_with_summary(batches, taxonomy, config).map(|(outputs, _)| outputs)
}
