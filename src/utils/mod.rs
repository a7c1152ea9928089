//! Utility modules for Arrow handling, table I/O and logging

pub mod arrow;
pub mod io;
pub mod logging;
