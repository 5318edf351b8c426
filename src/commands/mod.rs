//! CLI command handlers.
//!
//! This module contains the implementation for each CLI subcommand,
//! delegating to the cointegration pipeline.

mod analyze;

pub use analyze::{analyze, report_rows, run_analyze, ReportRow};
