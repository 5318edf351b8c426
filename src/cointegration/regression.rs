//! Engle-Granger step for one ordered pair
//!
//! Fits `dependent = intercept + slope·independent + residual` by OLS and
//! runs the ADF test on the residuals.

use super::adf::{adf_test, degenerate_stationary, AdfResult};
use super::error::{CointegrationError, Result};
use crate::math::ols::{self, OlsError};
use crate::math::stats::{is_constant, mean};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Residual SSR, relative to the dependent series' sum of squared deviations,
/// at or below which the fit is treated as exact
const EXACT_FIT_TOLERANCE: f64 = 1e-16;

/// Ordered pair: `dependent ~ independent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub dependent: String,
    pub independent: String,
}

impl Direction {
    pub fn new(dependent: impl Into<String>, independent: impl Into<String>) -> Self {
        Self {
            dependent: dependent.into(),
            independent: independent.into(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.dependent, self.independent)
    }
}

/// Outcome of regressing one series on another and testing the residuals
#[derive(Debug, Clone)]
pub struct RegressionResult {
    pub direction: Direction,
    pub intercept: f64,
    /// Hedge ratio
    pub slope: f64,
    /// One residual per observation, kept for half-life estimation
    pub residuals: Vec<f64>,
    pub adf: AdfResult,
}

impl RegressionResult {
    pub fn p_value(&self) -> f64 {
        self.adf.p_value
    }

    pub fn t_statistic(&self) -> f64 {
        self.adf.statistic
    }

    /// Dependent is an exact affine function of the independent series
    pub fn is_exact_fit(&self) -> bool {
        self.adf.statistic == f64::NEG_INFINITY
    }
}

/// Regress `dependent` on `independent` and test the residuals for stationarity.
///
/// When the fit is exact up to rounding (e.g. one price is a fixed multiple
/// of the other) the residuals carry no signal for the ADF regression. The
/// result then has statistic `-∞` and p-value 0 instead of a singular-design
/// error; see [`RegressionResult::is_exact_fit`].
///
/// # Errors
/// - `MalformedMatrix` if the series lengths differ
/// - `SingularDesign` if `independent` is constant
/// - `InsufficientData` if there are too few observations for the ADF test
pub fn regress(
    direction: Direction,
    dependent: &[f64],
    independent: &[f64],
    max_adf_lag: Option<usize>,
) -> Result<RegressionResult> {
    if dependent.len() != independent.len() {
        return Err(CointegrationError::MalformedMatrix(format!(
            "{direction}: {} dependent vs {} independent observations",
            dependent.len(),
            independent.len()
        )));
    }

    if is_constant(independent) {
        return Err(CointegrationError::singular(format!(
            "{direction}: independent series {} is constant",
            direction.independent
        )));
    }

    let fit = ols::fit(dependent, ols::with_intercept(&[independent])).map_err(|e| match e {
        OlsError::RankDeficient => {
            CointegrationError::singular(format!("{direction}: rank-deficient design"))
        }
        OlsError::Underdetermined { nobs, params } => CointegrationError::InsufficientData {
            expected: params + 1,
            actual: nobs,
        },
    })?;

    let adf = if fit.ssr <= EXACT_FIT_TOLERANCE * sum_squared_deviations(dependent) {
        degenerate_stationary(fit.residuals.len())?
    } else {
        adf_test(&fit.residuals, max_adf_lag)?
    };

    Ok(RegressionResult {
        direction,
        intercept: fit.params[0],
        slope: fit.params[1],
        residuals: fit.residuals,
        adf,
    })
}

fn sum_squared_deviations(values: &[f64]) -> f64 {
    let m = mean(values).unwrap_or(0.0);
    values.iter().map(|v| (v - m).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn walk(n: usize, rng: &mut StdRng) -> Vec<f64> {
        let step = Normal::new(0.0, 0.01).unwrap();
        let mut level = 4.0;
        (0..n)
            .map(|_| {
                level += step.sample(rng);
                level
            })
            .collect()
    }

    #[test]
    fn test_recovers_hedge_ratio() {
        let mut rng = StdRng::seed_from_u64(11);
        let x = walk(500, &mut rng);
        let noise = Normal::new(0.0, 0.001).unwrap();
        let y: Vec<f64> = x
            .iter()
            .map(|v| 0.5 + 1.5 * v + noise.sample(&mut rng))
            .collect();

        let result = regress(Direction::new("Y", "X"), &y, &x, None).unwrap();
        assert_relative_eq!(result.slope, 1.5, epsilon = 0.05);
        assert_eq!(result.residuals.len(), 500);
        assert_eq!(result.direction.to_string(), "Y~X");
        assert!(result.p_value() < 0.01);
    }

    #[test]
    fn test_fixed_price_ratio_is_exact_fit() {
        // log(2·A) = ln 2 + log(A)
        let mut rng = StdRng::seed_from_u64(21);
        let x = walk(300, &mut rng);
        let y: Vec<f64> = x.iter().map(|v| v + 2.0_f64.ln()).collect();

        let result = regress(Direction::new("Y", "X"), &y, &x, None).unwrap();
        assert!(result.is_exact_fit());
        assert_eq!(result.p_value(), 0.0);
        assert_eq!(result.t_statistic(), f64::NEG_INFINITY);
        assert_relative_eq!(result.slope, 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.intercept, 2.0_f64.ln(), epsilon = 1e-8);
    }

    #[test]
    fn test_noisy_fit_is_not_exact() {
        let mut rng = StdRng::seed_from_u64(22);
        let x = walk(300, &mut rng);
        let noise = Normal::new(0.0, 0.001).unwrap();
        let y: Vec<f64> = x.iter().map(|v| v + noise.sample(&mut rng)).collect();
        let result = regress(Direction::new("Y", "X"), &y, &x, None).unwrap();
        assert!(!result.is_exact_fit());
        assert!(result.t_statistic().is_finite());
    }

    #[test]
    fn test_constant_independent_is_singular() {
        let x = vec![3.0; 40];
        let y: Vec<f64> = (0..40).map(|i| i as f64).collect();
        assert!(matches!(
            regress(Direction::new("Y", "X"), &y, &x, None),
            Err(CointegrationError::SingularDesign { .. })
        ));
    }

    #[test]
    fn test_short_series_is_insufficient() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        assert!(matches!(
            regress(Direction::new("Y", "X"), &y, &x, None),
            Err(CointegrationError::InsufficientData { .. })
        ));
    }
}
