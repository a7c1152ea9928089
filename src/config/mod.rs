//! Configuration for classification runs and table loading.

/// Default identifier column of the input table
pub const DEFAULT_ID_COLUMN: &str = "Reference Key";
/// Default raw diagnosis-code column of the input table
pub const DEFAULT_CODES_COLUMN: &str = "All Diagnosis Code (ICD9)";
/// Default date column of the input table
pub const DEFAULT_DATE_COLUMN: &str = "Reference Date";

/// Default batch size for table reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Environment variable overriding the reader batch size
pub const BATCH_SIZE_ENV: &str = "ICD9_DX_BATCH_SIZE";

/// Markers that a CSV export leaves in place of a missing value
pub const DEFAULT_MISSING_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Configuration for the batch classifier
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Column carrying the record identifier (passed through)
    pub id_column: String,
    /// Column carrying the raw delimited code list
    pub codes_column: String,
    /// Column carrying the record date (passed through)
    pub date_column: String,
    /// Raw values treated as a missing code list
    pub missing_values: Vec<String>,
    /// Whether rows may be classified on the rayon pool
    pub parallel: bool,
    /// Minimum number of rows in a batch before the parallel path is used
    pub parallel_threshold: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            codes_column: DEFAULT_CODES_COLUMN.to_string(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            missing_values: DEFAULT_MISSING_VALUES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            parallel: true,
            parallel_threshold: 1024,
        }
    }
}

impl ClassifierConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier column name
    #[must_use]
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    /// Set the raw code-list column name
    #[must_use]
    pub fn with_codes_column(mut self, column: impl Into<String>) -> Self {
        self.codes_column = column.into();
        self
    }

    /// Set the date column name
    #[must_use]
    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }

    /// Replace the missing-value markers
    #[must_use]
    pub fn with_missing_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Classify every batch on the calling thread
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the row count from which batches are classified in parallel
    #[must_use]
    pub fn with_parallel_threshold(mut self, rows: usize) -> Self {
        self.parallel = true;
        self.parallel_threshold = rows;
        self
    }

    /// The three columns that must exist before any row is classified
    #[must_use]
    pub fn required_columns(&self) -> [&str; 3] {
        [&self.id_column, &self.codes_column, &self.date_column]
    }

    /// Check whether a trimmed raw value is one of the missing-value markers
    #[must_use]
    pub fn is_missing_marker(&self, trimmed: &str) -> bool {
        self.missing_values.iter().any(|m| m == trimmed)
    }
}

/// Configuration for reading input tables
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Number of rows per record batch
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }
}

impl ReaderConfig {
    /// Set the batch size, ignoring zero
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        if batch_size > 0 {
            self.batch_size = batch_size;
        }
        self
    }
}

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var(BATCH_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|size| *size > 0)
}
