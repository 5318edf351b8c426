//! Augmented Dickey-Fuller (ADF) stationarity test
//!
//! Tests a series for a unit root with an estimated constant and no trend,
//! selecting the number of lagged differences by AIC.
//!
//! # Test Regression
//! ```text
//! Δy[t] = c + γ·y[t-1] + Σ_{i=1..p} φ_i·Δy[t-i] + ε[t]
//! ```
//! Under H0 (unit root) γ = 0. The statistic is the t-value of γ; more
//! negative values reject the unit root more strongly.
//!
//! # P-Values
//! MacKinnon (1994) response-surface approximation for the constant-only
//! case with a single variable, mapped through the standard normal CDF.

use super::error::{CointegrationError, Result};
use crate::math::ols::{self, OlsError, OlsFit};
use nalgebra::DMatrix;
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Minimum series length for a reliable test
pub const MIN_ADF_OBSERVATIONS: usize = 20;

/// Statistic above which the p-value saturates at 1
const TAU_MAX: f64 = 2.74;
/// Statistic below which the p-value saturates at 0
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials
const TAU_STAR: f64 = -1.61;
/// Small-p polynomial, ascending powers of the statistic
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
/// Large-p polynomial, ascending powers of the statistic
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Outcome of an ADF test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// t-value of the lagged level coefficient
    pub statistic: f64,
    /// Approximate asymptotic p-value
    pub p_value: f64,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Rows in the final regression
    pub nobs: usize,
}

/// Default upper bound on the lag search: `ceil(12·(n/100)^¼)`, capped at `n/2 − 2`
pub fn default_max_lag(n: usize) -> usize {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    schwert.min((n / 2).saturating_sub(2))
}

/// Run the ADF test on `series`.
///
/// `max_lag` bounds the AIC lag search; `None` uses [`default_max_lag`].
///
/// # Errors
/// - `InsufficientData` if the series is shorter than [`MIN_ADF_OBSERVATIONS`]
/// - `SingularDesign` if a test regression is rank-deficient (e.g. a constant series)
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> Result<AdfResult> {
    let n = series.len();
    if n < MIN_ADF_OBSERVATIONS {
        return Err(CointegrationError::InsufficientData {
            expected: MIN_ADF_OBSERVATIONS,
            actual: n,
        });
    }

    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let max_lag = max_lag
        .unwrap_or_else(|| default_max_lag(n))
        .min((n / 2).saturating_sub(2));

    // Lag search on a common sample so AIC values are comparable
    let common_rows = diffs.len() - max_lag;
    let mut best_lag = 0;
    let mut best_aic = f64::INFINITY;
    for lag in 0..=max_lag {
        let fit = fit_lagged(series, &diffs, lag, common_rows)?;
        let aic = fit.aic();
        if aic < best_aic {
            best_aic = aic;
            best_lag = lag;
        }
    }

    let rows = diffs.len() - best_lag;
    let fit = fit_lagged(series, &diffs, best_lag, rows)?;
    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return Err(CointegrationError::singular(
            "ADF regression has zero residual variance",
        ));
    }

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag: best_lag,
        nobs: rows,
    })
}

/// Saturated result for a series that is identically zero up to rounding.
///
/// No regression can be fitted to such a series, but it has no unit root
/// either: the statistic is `-∞` and the p-value 0.
///
/// # Errors
/// `InsufficientData` if `n` is below [`MIN_ADF_OBSERVATIONS`]
pub fn degenerate_stationary(n: usize) -> Result<AdfResult> {
    if n < MIN_ADF_OBSERVATIONS {
        return Err(CointegrationError::InsufficientData {
            expected: MIN_ADF_OBSERVATIONS,
            actual: n,
        });
    }
    Ok(AdfResult {
        statistic: f64::NEG_INFINITY,
        p_value: 0.0,
        used_lag: 0,
        nobs: n - 1,
    })
}

/// Fit the ADF regression with `lag` lagged differences over the last `rows`
/// differences. Columns: `[1, y[t-1], Δy[t-1], ..., Δy[t-lag]]`.
fn fit_lagged(series: &[f64], diffs: &[f64], lag: usize, rows: usize) -> Result<OlsFit> {
    let offset = diffs.len() - rows;
    let target = &diffs[offset..];
    let design = DMatrix::from_fn(rows, lag + 2, |r, c| {
        let t = offset + r;
        match c {
            0 => 1.0,
            1 => series[t],
            _ => diffs[t - (c - 1)],
        }
    });

    ols::fit(target, design).map_err(|e| match e {
        OlsError::RankDeficient => {
            CointegrationError::singular(format!("ADF regression with {lag} lags is rank-deficient"))
        }
        OlsError::Underdetermined { nobs, params } => CointegrationError::InsufficientData {
            expected: params + 1,
            actual: nobs,
        },
    })
}

/// MacKinnon (1994) approximate p-value for the constant-only ADF statistic
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * statistic + c);
    standard_normal_cdf(z)
}

fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};

    fn ar1_series(phi: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut x = vec![0.0; n];
        for t in 1..n {
            let eps: f64 = StandardNormal.sample(&mut rng);
            x[t] = phi * x[t - 1] + eps;
        }
        x
    }

    #[test]
    fn test_insufficient_data() {
        let spread: Vec<f64> = (0..15).map(|x| x as f64).collect();
        assert!(matches!(
            adf_test(&spread, None),
            Err(CointegrationError::InsufficientData {
                expected: 20,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_constant_series_is_singular() {
        let spread = vec![5.0; 50];
        assert!(matches!(
            adf_test(&spread, None),
            Err(CointegrationError::SingularDesign { .. })
        ));
    }

    #[test]
    fn test_mean_reverting_rejects_unit_root() {
        let spread = ar1_series(0.3, 300, 7);
        let result = adf_test(&spread, None).unwrap();
        assert!(
            result.statistic < -5.0,
            "expected strongly negative statistic, got {:.2}",
            result.statistic
        );
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_random_walks_keep_unit_root() {
        let kept = (0..10)
            .filter(|seed| {
                let walk = ar1_series(1.0, 300, *seed);
                adf_test(&walk, None).unwrap().p_value > 0.05
            })
            .count();
        assert!(kept >= 7, "only {kept} of 10 random walks kept the unit root");
    }

    #[test]
    fn test_fixed_lag_bound_respected() {
        let series = ar1_series(0.8, 120, 3);
        let result = adf_test(&series, Some(2)).unwrap();
        assert!(result.used_lag <= 2);
        assert_eq!(result.nobs, 119 - result.used_lag);
    }

    #[test]
    fn test_degenerate_stationary() {
        let result = degenerate_stationary(300).unwrap();
        assert_eq!(result.statistic, f64::NEG_INFINITY);
        assert_eq!(result.p_value, 0.0);
        assert_eq!(result.nobs, 299);
        assert!(matches!(
            degenerate_stationary(10),
            Err(CointegrationError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_default_max_lag() {
        assert_eq!(default_max_lag(100), 12);
        assert_eq!(default_max_lag(1500), 24);
        assert_eq!(default_max_lag(20), 8);
    }

    #[test]
    fn test_mackinnon_reference_points() {
        // 5% and 1% asymptotic critical values for one variable with constant
        assert_relative_eq!(mackinnon_p_value(-2.8621), 0.05, epsilon = 2e-3);
        assert_relative_eq!(mackinnon_p_value(-3.4304), 0.01, epsilon = 1e-3);
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-20.0), 0.0);
    }

    #[test]
    fn test_mackinnon_monotone() {
        let mut prev = 0.0;
        let mut t = -18.0;
        while t < 2.7 {
            let p = mackinnon_p_value(t);
            assert!(p >= prev - 1e-9, "p-value decreased at {t}");
            prev = p;
            t += 0.1;
        }
    }
}
