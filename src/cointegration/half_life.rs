//! Ornstein-Uhlenbeck half-life of a residual spread
//!
//! Fits `Δe[i] = c + λ·e[i-1] + ε` and converts the reversion speed into the
//! number of periods a deviation needs to decay by half:
//!
//! ```text
//! half_life = −ln(2) / λ
//! ```
//!
//! Only meaningful when λ < 0. A cointegrated pair whose residuals give
//! λ ≥ 0 is reported as [`HalfLife::NonMeanReverting`] instead of a negative
//! or infinite duration.

use super::error::{CointegrationError, Result};
use crate::math::ols::{self, OlsError};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

/// Mean-reversion half-life in periods (rows of the price matrix)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HalfLife {
    /// Finite half-life; 0 when the spread is identically flat (exact fit)
    Finite { periods: f64 },
    /// Pair was not classified as cointegrated; no reversion claim is made
    NotCointegrated,
    /// Classified as cointegrated but the fitted speed is not negative
    NonMeanReverting { lambda: f64 },
}

impl HalfLife {
    /// Half-life in periods, `+∞` unless finite
    pub fn periods(&self) -> f64 {
        match self {
            Self::Finite { periods } => *periods,
            _ => f64::INFINITY,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite { .. })
    }

    /// Warning-level flag: cointegrated but no mean reversion
    pub fn is_non_mean_reverting(&self) -> bool {
        matches!(self, Self::NonMeanReverting { .. })
    }
}

/// Estimate the half-life of `residuals`.
///
/// Returns [`HalfLife::NotCointegrated`] without fitting when
/// `is_cointegrated` is false.
///
/// # Errors
/// - `InsufficientData` for fewer than 3 residuals
/// - `SingularDesign` if the lagged residuals are constant
pub fn half_life(is_cointegrated: bool, residuals: &[f64]) -> Result<HalfLife> {
    if !is_cointegrated {
        return Ok(HalfLife::NotCointegrated);
    }

    let lambda = reversion_speed(residuals)?;
    if lambda < 0.0 {
        return Ok(HalfLife::Finite {
            periods: -LN_2 / lambda,
        });
    }

    Ok(HalfLife::NonMeanReverting { lambda })
}

/// Slope λ of the residual differences on the lagged residuals.
///
/// The lag at index 0 is defined as 0, so row 0 carries no information and
/// the regression runs over rows `1..n`.
pub fn reversion_speed(residuals: &[f64]) -> Result<f64> {
    if residuals.len() < 3 {
        return Err(CointegrationError::InsufficientData {
            expected: 3,
            actual: residuals.len(),
        });
    }

    let lagged = &residuals[..residuals.len() - 1];
    let delta: Vec<f64> = residuals.windows(2).map(|w| w[1] - w[0]).collect();

    let fit = ols::fit(&delta, ols::with_intercept(&[lagged])).map_err(|e| match e {
        OlsError::RankDeficient => CointegrationError::singular("half-life regression on constant residuals"),
        OlsError::Underdetermined { nobs, params } => CointegrationError::InsufficientData {
            expected: params + 1,
            actual: nobs,
        },
    })?;

    Ok(fit.params[1])
}
