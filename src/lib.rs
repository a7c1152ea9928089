//! A Rust library for classifying ICD-9 diagnosis code lists into clinical
//! category flags, operating on Arrow record batches.
//!
//! ```no_run
//! use icd9_dx::{ClassifierConfig, Taxonomy, classify_raw};
//!
//! let taxonomy = Taxonomy::reference()?;
//! let result = classify_raw(Some("410.01, 250.00"), &taxonomy, &ClassifierConfig::default());
//! assert!(result.composite());
//! # Ok::<(), icd9_dx::DxError>(())
//! ```

pub mod algorithm;
pub mod config;
pub mod error;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{ClassifierConfig, ReaderConfig};
pub use error::{DxError, Result};

// Classification engine
pub use algorithm::icd9::{
    BatchSummary, Category, ClassificationResult, CodeRange, CompositeFlag, Pattern, Taxonomy,
    classify, classify_batch, classify_batches, classify_raw, matches, output_schema, tokenize,
    validate_input_schema,
};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Table I/O
pub use utils::io::{Table, TableFormat, read_table, write_table};
