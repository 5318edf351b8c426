//! Numerical primitives shared by the cointegration pipeline.
//!
//! Least-squares fitting backed by `nalgebra` and the descriptive
//! statistics used for candidate filtering.

pub mod ols;
pub mod stats;

pub use ols::{OlsError, OlsFit};
pub use stats::pearson_correlation;
