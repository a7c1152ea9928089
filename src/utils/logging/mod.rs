//! Logging utilities for output and progress tracking

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use self::log::{Transfer, log_table_warning, log_transfer_complete, log_transfer_start};
pub use progress::{create_main_progress_bar, finish_progress_bar};
