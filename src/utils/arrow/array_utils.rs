//! Utilities for working with Arrow arrays.
//!
//! Column lookup with clear errors, and the text coercion applied to the
//! raw code-list column before it is tokenized.

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use log::{info, warn};

use crate::error::{DxError, Result};

/// Get the column index by name from a schema
///
/// # Errors
/// Returns [`DxError::ColumnNotFound`] if the column does not exist
pub fn get_column_index(schema: &Schema, column_name: &str) -> Result<usize> {
    schema
        .index_of(column_name)
        .map_err(|_| DxError::column_not_found(column_name))
}

/// Get a column from a record batch by name
///
/// # Errors
/// Returns [`DxError::ColumnNotFound`] if the column does not exist
pub fn get_column_by_name(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = get_column_index(&batch.schema(), column_name)?;
    Ok(batch.column(idx).clone())
}

/// Check that every named column exists in the schema
///
/// The first missing column is reported.
pub fn require_columns(schema: &Schema, columns: &[&str]) -> Result<()> {
    for column in columns {
        get_column_index(schema, column)?;
    }
    Ok(())
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| DxError::InvalidDataType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
        })
}

/// Coerce a column to `Utf8` so its values can be tokenized as text
///
/// Numeric columns (a code list that a loader inferred as `Float64`) are
/// cast to their textual form. If the cast is not possible the column is
/// reported and `None` is returned; callers treat every row as missing.
#[must_use]
pub fn column_as_utf8(column: &ArrayRef, column_name: &str) -> Option<ArrayRef> {
    let actual_type = column.data_type();
    if actual_type == &DataType::Utf8 {
        return Some(column.clone());
    }

    info!("Converting column '{column_name}' from {actual_type:?} to Utf8");
    match cast(column, &DataType::Utf8) {
        Ok(converted) => Some(converted),
        Err(err) => {
            warn!("Failed to convert column '{column_name}' to Utf8, treating values as missing: {err}");
            None
        }
    }
}

/// Borrow a `Utf8` column as a [`StringArray`]
pub fn as_string_array<'a>(array: &'a ArrayRef, column_name: &str) -> Result<&'a StringArray> {
    downcast_array::<StringArray>(array, column_name, "StringArray")
}
