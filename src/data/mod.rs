//! Price history collaborators
//!
//! The cointegration core only sees a [`PriceMatrix`]. Sources behind the
//! [`PriceSource`] trait are responsible for alignment, gap filling and
//! positivity of what they hand over.

pub mod csv_source;
pub mod synthetic;

pub use csv_source::CsvPriceSource;
pub use synthetic::SyntheticPriceSource;

use crate::cointegration::{CointegrationError, PriceMatrix};
use thiserror::Error;

/// Errors raised while acquiring price history
#[derive(Error, Debug)]
pub enum DataError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Date parsing error
    #[error("Date parsing error: {0}")]
    DateParse(String),

    /// Cell that is neither empty nor a number
    #[error("Invalid price '{value}' for {ticker} on line {line}")]
    InvalidPrice {
        ticker: String,
        line: usize,
        value: String,
    },

    /// Column (or whole file) without usable prices
    #[error("Empty column: {0}")]
    EmptyColumn(String),

    /// Not enough history for analysis
    #[error("Insufficient history: expected at least {expected} rows, got {actual}")]
    TooFewRows { expected: usize, actual: usize },

    /// Synthetic generator misconfigured
    #[error("Synthetic data error: {0}")]
    Synthetic(String),

    /// Loaded data violates price matrix invariants
    #[error(transparent)]
    Matrix(#[from] CointegrationError),
}

/// Supplies an aligned, gap-filled, strictly positive price history
#[cfg_attr(test, mockall::automock)]
pub trait PriceSource {
    fn load_price_matrix(&self) -> Result<PriceMatrix, DataError>;
}
