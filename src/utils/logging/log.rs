//! Log lines for table reads and writes

use std::path::Path;
use std::time::Duration;

use log::{info, warn};

/// Direction of a table transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Read,
    Write,
}

impl Transfer {
    const fn progressive(self) -> &'static str {
        match self {
            Self::Read => "Reading",
            Self::Write => "Writing",
        }
    }

    const fn past(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Wrote",
        }
    }

    const fn preposition(self) -> &'static str {
        match self {
            Self::Read => "from",
            Self::Write => "to",
        }
    }
}

/// Log the start of a table transfer, e.g. `Reading CSV table input.csv`
pub fn log_transfer_start(transfer: Transfer, format: &str, path: &Path) {
    info!("{} {format} table {}", transfer.progressive(), path.display());
}

/// Log a finished transfer with its row count and duration
pub fn log_transfer_complete(transfer: Transfer, path: &Path, rows: usize, elapsed: Duration) {
    info!("{}", transfer_summary(transfer, path, rows, elapsed));
}

fn transfer_summary(transfer: Transfer, path: &Path, rows: usize, elapsed: Duration) -> String {
    format!(
        "{} {rows} rows {} {} in {elapsed:?}",
        transfer.past(),
        transfer.preposition(),
        path.display()
    )
}

/// Warn about something odd in a table file
pub fn log_table_warning(message: &str, path: &Path) {
    warn!("{message}: {}", path.display());
}
