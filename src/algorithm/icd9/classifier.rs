//! Per-record classification
//!
//! Every category is evaluated independently against the record's tokens.
//! The composite flag is derived afterwards from the category flags alone.

use super::taxonomy::Taxonomy;
use super::tokenizer::tokenize_with_config;
use crate::config::ClassifierConfig;

/// Category flags for one record, aligned with taxonomy order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassificationResult {
    flags: Vec<bool>,
    composite: bool,
}

impl ClassificationResult {
    /// A result with every flag cleared
    #[must_use]
    pub fn empty(taxonomy: &Taxonomy) -> Self {
        Self {
            flags: vec![false; taxonomy.len()],
            composite: false,
        }
    }

    /// Flags in taxonomy order
    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Flag of the category at `idx`
    #[must_use]
    pub fn flag(&self, idx: usize) -> Option<bool> {
        self.flags.get(idx).copied()
    }

    /// Flag of a category by name
    #[must_use]
    pub fn flag_by_name(&self, taxonomy: &Taxonomy, name: &str) -> Option<bool> {
        taxonomy.index_of(name).and_then(|idx| self.flag(idx))
    }

    /// The derived composite flag
    #[must_use]
    pub const fn composite(&self) -> bool {
        self.composite
    }

    /// Whether no category matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|f| *f)
    }

    /// Names of the matched categories, in taxonomy order
    pub fn matched_categories<'t>(&self, taxonomy: &'t Taxonomy) -> impl Iterator<Item = &'t str> {
        taxonomy
            .category_names()
            .zip(&self.flags)
            .filter_map(|(name, flag)| flag.then_some(name))
    }

    /// Category flags as 0/1 integers
    pub fn flag_values(&self) -> impl Iterator<Item = i32> + '_ {
        self.flags.iter().map(|flag| i32::from(*flag))
    }

    /// Composite flag as a 0/1 integer
    #[must_use]
    pub fn composite_value(&self) -> i32 {
        i32::from(self.composite)
    }
}

/// Classify one record's tokens against the taxonomy
///
/// A category is flagged iff at least one token matches at least one of its
/// patterns. The composite flag is the OR of its member category flags.
#[must_use]
pub fn classify<S: AsRef<str>>(tokens: &[S], taxonomy: &Taxonomy) -> ClassificationResult {
    if tokens.is_empty() {
        return ClassificationResult::empty(taxonomy);
    }

    let flags: Vec<bool> = taxonomy
        .categories()
        .iter()
        .map(|category| category.matches_any(tokens))
        .collect();

    let composite = taxonomy
        .composite()
        .members()
        .iter()
        .any(|&idx| flags[idx]);

    ClassificationResult { flags, composite }
}

/// Tokenize a raw code-list cell and classify it
#[must_use]
pub fn classify_raw(
    raw: Option<&str>,
    taxonomy: &Taxonomy,
    config: &ClassifierConfig,
) -> ClassificationResult {
    let tokens = tokenize_with_config(raw, config);
    classify(tokens.as_slice(), taxonomy)
}
