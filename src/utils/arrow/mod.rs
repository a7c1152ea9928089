//! Arrow data handling utilities

pub mod array_utils;

// Re-export commonly used functions for convenience
pub use array_utils::{column_as_utf8, get_column_by_name, require_columns};
