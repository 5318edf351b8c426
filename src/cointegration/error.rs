//! Error types for the cointegration pipeline

use thiserror::Error;

/// Errors that can occur while screening pairs for cointegration
#[derive(Error, Debug)]
pub enum CointegrationError {
    /// A price was not strictly positive, so its logarithm is undefined
    #[error("Non-positive price {price} for {ticker} at row {row}")]
    Domain {
        ticker: String,
        row: usize,
        price: f64,
    },

    /// Regressor matrix is rank-deficient (e.g. a constant series)
    #[error("Singular design matrix: {context}")]
    SingularDesign { context: String },

    /// Too few observations for a reliable stationarity test
    #[error("Insufficient data: expected at least {expected} observations, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Price matrix violates its shape or index invariants
    #[error("Malformed price matrix: {0}")]
    MalformedMatrix(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Run was cancelled between pairs
    #[error("Analysis cancelled after {completed} of {total} pairs")]
    Cancelled { completed: usize, total: usize },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CointegrationError {
    pub(crate) fn singular(context: impl Into<String>) -> Self {
        Self::SingularDesign {
            context: context.into(),
        }
    }

    /// Whether this error only concerns one pair and can be skipped in a batch
    pub fn is_pair_local(&self) -> bool {
        matches!(
            self,
            Self::SingularDesign { .. } | Self::InsufficientData { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CointegrationError>;
