//! Algorithm implementations
//!
//! Currently the ICD-9 category classifier.

pub mod icd9;
