//! ICD-9 diagnosis classification
//!
//! Turns a record's free-text list of ICD-9 codes into one 0/1 flag per
//! clinical category, plus a composite flag over a fixed subset of
//! categories (MACE in the reference taxonomy).
//!
//! The pieces, leaf first:
//! - [`pattern`]: decides whether one code satisfies one pattern
//! - [`taxonomy`]: the ordered category table and composite definition
//! - [`tokenizer`]: splits a raw cell into candidate codes
//! - [`classifier`]: flags one record
//! - [`batch`]: flags every row of an Arrow record batch

pub mod batch;
pub mod classifier;
pub mod pattern;
pub mod taxonomy;
pub mod tokenizer;

pub use batch::{
    BatchSummary, classify_batch, classify_batch_with_summary, classify_batches,
    classify_batches_with_summary, output_schema, validate_input_schema,
};
pub use classifier::{ClassificationResult, classify, classify_raw};
pub use pattern::{CodeRange, Pattern, matches};
pub use taxonomy::{Category, CompositeFlag, Taxonomy};
pub use tokenizer::{tokenize, tokenize_with_config};
