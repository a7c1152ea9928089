//! Splitting raw code lists into candidate codes
//!
//! Input tables carry all of a record's diagnoses in a single free-text
//! cell (`"410.01, 250.00"`, `"428;V43.4"`, ...). Any character that is not
//! alphanumeric and not `.` separates two codes. Case is preserved.

use smallvec::SmallVec;

use crate::config::ClassifierConfig;

/// Candidate codes of one record, borrowed from the raw cell
pub type Tokens<'a> = SmallVec<[&'a str; 8]>;

/// Whether a character can be part of a code
#[inline]
fn is_code_char(c: char) -> bool {
    c.is_alphanumeric() || c == '.'
}

/// Split a raw code list into non-empty candidate tokens
///
/// `None` (a null cell) and blank strings yield no tokens.
#[must_use]
pub fn tokenize(raw: Option<&str>) -> Tokens<'_> {
    match raw {
        Some(raw) => raw
            .split(|c: char| !is_code_char(c))
            .filter(|token| !token.is_empty())
            .collect(),
        None => Tokens::new(),
    }
}

/// Tokenize a raw cell, treating configured missing-value markers as empty
///
/// A CSV export may leave `nan` or `NULL` where a cell was empty; those must
/// not reach the matcher as codes.
#[must_use]
pub fn tokenize_with_config<'a>(raw: Option<&'a str>, config: &ClassifierConfig) -> Tokens<'a> {
    match raw {
        Some(value) if config.is_missing_marker(value.trim()) => Tokens::new(),
        other => tokenize(other),
    }
}
