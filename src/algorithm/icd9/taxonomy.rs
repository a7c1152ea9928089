//! Category taxonomy
//!
//! The taxonomy is an ordered list of named categories, each with its own
//! list of [`Pattern`]s, plus one composite flag defined as the union of a
//! fixed subset of categories. It is declarative data: the reference table
//! ships as an embedded JSON asset, and callers can load their own file with
//! the same layout.
//!
//! ```json
//! {
//!   "composite": { "name": "MACE", "members": ["Heart failure"] },
//!   "categories": [
//!     { "name": "Heart failure", "group": "cardiovascular", "patterns": ["428", "398.91"] },
//!     { "name": "Cerebrovascular disease (430-438)", "patterns": ["430-438"] },
//!     { "name": "Custom", "patterns": [{ "exact": "V08" }, { "range": ["001", "139"] }] }
//!   ]
//! }
//! ```
//!
//! A taxonomy is immutable once built and is shared by reference across
//! classification threads.

use std::path::Path;

use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::pattern::{CodeRange, Pattern};
use crate::error::util::safe_read_to_string;
use crate::error::{DxError, Result};

/// The reference taxonomy, 147 categories with the MACE composite
pub const REFERENCE_TAXONOMY_JSON: &str =
    include_str!("../../../assets/icd9_reference_taxonomy.json");

/// A named clinical category
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    group: Option<String>,
    note: Option<String>,
    patterns: Vec<Pattern>,
}

impl Category {
    /// Create a category from its name and patterns
    #[must_use]
    pub fn new(name: impl Into<String>, patterns: Vec<Pattern>) -> Self {
        Self {
            name: name.into(),
            group: None,
            note: None,
            patterns,
        }
    }

    /// Create a category from compact pattern notation (`"410"`, `"430-438"`)
    #[must_use]
    pub fn from_notation(name: impl Into<String>, patterns: &[&str]) -> Self {
        Self::new(
            name,
            patterns.iter().map(|p| Pattern::from_notation(p)).collect(),
        )
    }

    /// Attach a grouping label
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Attach a free-text note
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Check whether any token satisfies any of the category's patterns
    #[must_use]
    pub fn matches_any<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        tokens.iter().any(|token| {
            let token = token.as_ref();
            self.patterns.iter().any(|pattern| pattern.matches(token))
        })
    }
}

/// Derived flag set when any member category is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeFlag {
    name: String,
    members: Vec<usize>,
}

impl CompositeFlag {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Indices of the member categories, in taxonomy order
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// Ordered, immutable set of categories plus the composite flag definition
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
    index: FxHashMap<String, usize>,
    composite: CompositeFlag,
}

impl Taxonomy {
    /// Build a taxonomy, validating names and composite membership
    ///
    /// # Errors
    /// Returns [`DxError::Taxonomy`] for blank or duplicate category names,
    /// a blank composite name, a composite name equal to a category name, or
    /// a composite member that is not one of the categories.
    pub fn new<S: AsRef<str>>(
        categories: Vec<Category>,
        composite_name: impl Into<String>,
        composite_members: &[S],
    ) -> Result<Self> {
        let mut index = FxHashMap::default();
        for (i, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(DxError::taxonomy(format!(
                    "category at position {i} has an empty name"
                )));
            }
            if index.insert(category.name.clone(), i).is_some() {
                return Err(DxError::taxonomy(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
            if category.patterns.is_empty() {
                warn!("Category '{}' has no patterns and never matches", category.name);
            }
            for pattern in &category.patterns {
                if let Pattern::Range(range) = pattern {
                    warn_on_malformed_range(&category.name, range);
                }
            }
        }

        let composite_name = composite_name.into();
        if composite_name.trim().is_empty() {
            return Err(DxError::taxonomy("composite flag has an empty name"));
        }
        if index.contains_key(&composite_name) {
            return Err(DxError::taxonomy(format!(
                "composite flag '{composite_name}' collides with a category name"
            )));
        }

        let mut members = Vec::with_capacity(composite_members.len());
        for member in composite_members {
            let member = member.as_ref();
            let idx = *index.get(member).ok_or_else(|| {
                DxError::taxonomy(format!(
                    "composite member '{member}' is not a category of the taxonomy"
                ))
            })?;
            if !members.contains(&idx) {
                members.push(idx);
            }
        }
        members.sort_unstable();

        debug!(
            "Built taxonomy with {} categories, composite '{}' over {} members",
            categories.len(),
            composite_name,
            members.len()
        );

        Ok(Self {
            categories,
            index,
            composite: CompositeFlag {
                name: composite_name,
                members,
            },
        })
    }

    /// Parse the embedded reference taxonomy
    pub fn reference() -> Result<Self> {
        Self::from_json_str(REFERENCE_TAXONOMY_JSON)
    }

    /// Parse a taxonomy document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: TaxonomyDocument = serde_json::from_str(json)?;
        document.into_taxonomy()
    }

    /// Load a taxonomy document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = safe_read_to_string(path, "taxonomy definition")?;
        Self::from_json_str(&json)
    }

    /// Number of categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in declaration order
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in declaration order
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::name)
    }

    /// Look up a category by name
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.index_of(name).map(|idx| &self.categories[idx])
    }

    /// Position of a category in declaration order
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub const fn composite(&self) -> &CompositeFlag {
        &self.composite
    }

    /// Check whether the category at `idx` feeds the composite flag
    #[must_use]
    pub fn is_composite_member(&self, idx: usize) -> bool {
        self.composite.members.binary_search(&idx).is_ok()
    }
}

fn warn_on_malformed_range(category: &str, range: &CodeRange) {
    if !range.is_well_formed() {
        warn!(
            "Range {}-{} in category '{}' has a non-numeric bound and will never match",
            range.low(),
            range.high(),
            category
        );
    }
}

#[derive(Debug, Deserialize)]
struct TaxonomyDocument {
    composite: CompositeDocument,
    categories: Vec<CategoryDocument>,
}

#[derive(Debug, Deserialize)]
struct CompositeDocument {
    name: String,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryDocument {
    name: String,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    note: Option<String>,
    patterns: Vec<PatternDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternDocument {
    Notation(String),
    Exact { exact: String },
    Prefix { prefix: String },
    Range { range: [String; 2] },
}

impl From<PatternDocument> for Pattern {
    fn from(document: PatternDocument) -> Self {
        match document {
            PatternDocument::Notation(notation) => Self::from_notation(&notation),
            PatternDocument::Exact { exact } => Self::Exact(exact.trim().to_string()),
            PatternDocument::Prefix { prefix } => {
                Self::HierarchicalPrefix(prefix.trim().to_string())
            }
            PatternDocument::Range { range: [low, high] } => Self::range(low, high),
        }
    }
}

impl TaxonomyDocument {
    fn into_taxonomy(self) -> Result<Taxonomy> {
        let categories = self
            .categories
            .into_iter()
            .map(|doc| Category {
                name: doc.name,
                group: doc.group,
                note: doc.note,
                patterns: doc.patterns.into_iter().map(Pattern::from).collect(),
            })
            .collect();

        Taxonomy::new(categories, self.composite.name, self.composite.members.as_slice())
    }
}
