//! Utility functions for error handling
//!
//! File helpers that attach the path and purpose to I/O failures so the
//! message reaching the user says which file was involved and why.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{DxError, Result};

fn with_context(error: &io::Error, path: &Path, context: &str) -> DxError {
    DxError::Io(io::Error::new(
        error.kind(),
        format!("{context} ({}): {error}", path.display()),
    ))
}

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(DxError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("File not found ({}), needed for: {purpose}", path.display()),
        )));
    }

    if !path.is_file() {
        return Err(DxError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Path is not a file ({}), expected a file for: {purpose}", path.display()),
        )));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "Permission denied - check file permissions".to_string(),
            _ => format!("Failed to open file for: {purpose}"),
        };
        with_context(&e, path, &context)
    })
}

/// Create (or truncate) an output file with rich error information
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(DxError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "Directory not found ({}), needed for: {purpose}",
                    parent.display()
                ),
            )));
        }
    }

    fs::File::create(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check directory permissions".to_string()
            }
            _ => format!("Failed to create file for: {purpose}"),
        };
        with_context(&e, path, &context)
    })
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    io::Read::read_to_string(&mut file, &mut content).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::InvalidData => {
                "File contains invalid UTF-8 data - cannot read as text".to_string()
            }
            _ => format!("Failed to read file content for: {purpose}"),
        };
        with_context(&e, path, &context)
    })?;

    Ok(content)
}
