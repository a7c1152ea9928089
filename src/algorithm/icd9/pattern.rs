//! Match patterns for ICD-9 codes
//!
//! A category is described by a list of patterns. Each pattern decides on
//! its own whether a single candidate code belongs to it:
//!
//! - [`Pattern::Exact`] compares strings.
//! - [`Pattern::HierarchicalPrefix`] accepts the code itself and every code
//!   below it in the dotted hierarchy (`410` covers `410.01`, but `41` does
//!   not cover `410`).
//! - [`Pattern::Range`] compares numerically, inclusive on both ends.

use std::fmt;

/// Inclusive numeric range over ICD-9 codes
///
/// Bounds are kept in their textual form for display and re-serialization.
/// They are parsed once on construction; a range with an unparseable bound
/// never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeRange {
    low: String,
    high: String,
    bounds: Option<(f64, f64)>,
}

impl CodeRange {
    /// Create a range from its textual bounds
    #[must_use]
    pub fn new(low: impl Into<String>, high: impl Into<String>) -> Self {
        let low = low.into().trim().to_string();
        let high = high.into().trim().to_string();
        let bounds = match (parse_code_number(&low), parse_code_number(&high)) {
            (Some(l), Some(h)) => Some((l, h)),
            _ => None,
        };
        Self { low, high, bounds }
    }

    /// Lower bound as written
    #[must_use]
    pub fn low(&self) -> &str {
        &self.low
    }

    /// Upper bound as written
    #[must_use]
    pub fn high(&self) -> &str {
        &self.high
    }

    /// Whether both bounds parsed as numbers
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.bounds.is_some()
    }

    /// Check if a candidate code falls inside the range
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        let Some((low, high)) = self.bounds else {
            return false;
        };
        parse_code_number(candidate).is_some_and(|value| low <= value && value <= high)
    }
}

/// Parse a code as a double, `None` on any malformed input
///
/// Letter-prefixed codes such as `V43.4` fall out here.
fn parse_code_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// One matching rule within a category
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Candidate must equal the code
    Exact(String),
    /// Candidate must equal the code or continue it after a `.`
    HierarchicalPrefix(String),
    /// Candidate must parse as a number inside the range
    Range(CodeRange),
}

impl Pattern {
    /// Build a pattern from the compact notation used in taxonomy files
    ///
    /// `"430-438"` becomes a range, anything else a hierarchical prefix.
    #[must_use]
    pub fn from_notation(notation: &str) -> Self {
        let notation = notation.trim();
        match notation.split_once('-') {
            Some((low, high)) => {
                // Only the first two dash-separated parts are bounds
                let high = high.split('-').next().unwrap_or(high);
                Self::Range(CodeRange::new(low, high))
            }
            None => Self::HierarchicalPrefix(notation.to_string()),
        }
    }

    /// Shorthand for a range pattern
    #[must_use]
    pub fn range(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self::Range(CodeRange::new(low, high))
    }

    /// Check whether a single candidate code satisfies this pattern
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        matches(candidate, self)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "={code}"),
            Self::HierarchicalPrefix(code) => write!(f, "{code}"),
            Self::Range(range) => write!(f, "{}-{}", range.low(), range.high()),
        }
    }
}

/// Decide whether one candidate code satisfies one pattern
///
/// Pure and total: malformed numbers simply do not match.
#[must_use]
pub fn matches(candidate: &str, pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Exact(code) => candidate == code,
        Pattern::HierarchicalPrefix(code) => is_hierarchical_match(candidate, code),
        Pattern::Range(range) => range.contains(candidate),
    }
}

/// `candidate == code` or `candidate` starts with `code` followed by `.`
fn is_hierarchical_match(candidate: &str, code: &str) -> bool {
    candidate
        .strip_prefix(code)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}
