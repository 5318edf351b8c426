//! MacKinnon response-surface critical value
//!
//! 5% critical value of the residual stationarity test with an estimated
//! constant and no trend, adjusted for sample size:
//!
//! ```text
//! cv(n) = c0 + c1/n + c2/n²
//! ```
//!
//! Coefficients from MacKinnon, "Critical Values for Cointegration Tests",
//! Table 1.

const C0: f64 = -3.3377;
const C1: f64 = -5.967;
const C2: f64 = -8.98;

/// Critical value for `observations` rows. Callers must pass at least 1.
pub fn critical_value(observations: usize) -> f64 {
    debug_assert!(observations >= 1, "critical value needs at least one observation");
    let n = observations as f64;
    C0 + C1 / n + C2 / (n * n)
}

/// Asymptotic limit of [`critical_value`] as the sample grows
pub const ASYMPTOTIC_CRITICAL_VALUE: f64 = C0;
