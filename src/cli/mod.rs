//! CLI argument parsing using clap.
//!
//! This module defines the command-line interface for statarb,
//! including all subcommands and their arguments.

mod config;

pub use config::{AnalyzeCliConfig, PriceInput};

use clap::{Parser, Subcommand};

/// statarb - Cointegrated pair screening
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub verbose: String,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Screen a price history for cointegrated pairs and rank them
    Analyze {
        /// Wide CSV price file (Date column followed by one column per ticker)
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<String>,
        /// Use generated prices instead of a CSV file
        #[arg(long, default_value_t = false)]
        synthetic: bool,
        /// Number of synthetic tickers
        #[arg(long, default_value_t = 6)]
        tickers: usize,
        /// Number of synthetic observations
        #[arg(long, default_value_t = 1500)]
        observations: usize,
        /// Seed for synthetic prices
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Only test pairs whose log-price correlation exceeds the threshold
        #[arg(long, default_value_t = false)]
        exclusionary: bool,
        /// Correlation threshold for --exclusionary
        #[arg(long)]
        correlation_threshold: Option<f64>,
        /// Number of ranked pairs to report
        #[arg(long)]
        top_n: Option<usize>,
        /// Worker threads (defaults to one per core)
        #[arg(long)]
        workers: Option<usize>,
        /// JSON analysis config; command-line flags override it
        #[arg(long)]
        config: Option<String>,
        /// Write ranked pairs as JSON to this path
        #[arg(long)]
        output: Option<String>,
    },
}
