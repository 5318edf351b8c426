//! Bidirectional Engle-Granger classification
//!
//! Each candidate pair is regressed both ways. The direction with the lower
//! residual p-value is kept, and the pair is classified as cointegrated when
//! that direction's ADF statistic is strictly below the critical value.
//!
//! Pairs are independent of each other, so the batch runs on the rayon pool
//! of the caller. Only the log-price matrix is shared, read-only.

use super::cancel::CancelFlag;
use super::config::AnalysisConfig;
use super::correlation::CorrelationPair;
use super::error::{CointegrationError, Result};
use super::half_life::{half_life, HalfLife};
use super::prices::LogPriceMatrix;
use super::regression::{regress, Direction, RegressionResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Classified pair with its chosen regression direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CointegrationRecord {
    pub pair: CorrelationPair,
    pub direction: Direction,
    pub hedge_ratio: f64,
    pub intercept: f64,
    pub p_value: f64,
    pub t_statistic: f64,
    /// Lagged differences selected for the ADF regression
    pub adf_lag: usize,
    /// Rows in the final ADF regression
    pub adf_observations: usize,
    pub is_cointegrated: bool,
    pub half_life: HalfLife,
}

/// A pair that could not be tested, kept for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFailure {
    pub pair: CorrelationPair,
    pub reason: String,
}

/// Records and skipped pairs from one batch
#[derive(Debug, Clone, Default)]
pub struct JudgeOutcome {
    pub records: Vec<CointegrationRecord>,
    pub failures: Vec<PairFailure>,
}

/// Keep the direction with the smaller p-value; ties go to `first`
pub fn choose_direction(first: RegressionResult, second: RegressionResult) -> RegressionResult {
    if first.p_value() <= second.p_value() {
        first
    } else {
        second
    }
}

/// Strictly below the critical value counts as cointegrated
pub fn is_cointegrated(t_statistic: f64, critical_value: f64) -> bool {
    t_statistic < critical_value
}

/// Run both regressions for one pair and build its record
pub fn judge_pair(
    pair: &CorrelationPair,
    log_prices: &LogPriceMatrix,
    critical_value: f64,
    max_adf_lag: Option<usize>,
) -> Result<CointegrationRecord> {
    let series_a = log_prices.column(&pair.ticker_a).ok_or_else(|| {
        CointegrationError::MalformedMatrix(format!("unknown ticker {}", pair.ticker_a))
    })?;
    let series_b = log_prices.column(&pair.ticker_b).ok_or_else(|| {
        CointegrationError::MalformedMatrix(format!("unknown ticker {}", pair.ticker_b))
    })?;

    let ab = regress(
        Direction::new(&pair.ticker_a, &pair.ticker_b),
        series_a,
        series_b,
        max_adf_lag,
    )?;
    let ba = regress(
        Direction::new(&pair.ticker_b, &pair.ticker_a),
        series_b,
        series_a,
        max_adf_lag,
    )?;

    let choice = choose_direction(ab, ba);
    let cointegrated = is_cointegrated(choice.t_statistic(), critical_value);
    // An exact fit has no deviations to decay
    let half_life = if choice.is_exact_fit() {
        HalfLife::Finite { periods: 0.0 }
    } else {
        half_life(cointegrated, &choice.residuals)?
    };

    debug!(
        pair = %pair.label(),
        direction = %choice.direction,
        p = format!("{:.4}", choice.p_value()),
        t = format!("{:.3}", choice.t_statistic()),
        cointegrated,
        "Pair tested"
    );

    if let HalfLife::NonMeanReverting { lambda } = half_life {
        warn!(
            pair = %pair.label(),
            direction = %choice.direction,
            lambda = format!("{:.6}", lambda),
            "Cointegrated pair is not mean reverting; half-life reported as infinite"
        );
    }

    Ok(CointegrationRecord {
        pair: pair.clone(),
        hedge_ratio: choice.slope,
        intercept: choice.intercept,
        p_value: choice.p_value(),
        t_statistic: choice.t_statistic(),
        adf_lag: choice.adf.used_lag,
        adf_observations: choice.adf.nobs,
        is_cointegrated: cointegrated,
        half_life,
        direction: choice.direction,
    })
}

/// Classify every pair. See [`judge_with_progress`].
pub fn judge(
    pairs: &[CorrelationPair],
    log_prices: &LogPriceMatrix,
    critical_value: f64,
    config: &AnalysisConfig,
    cancel: &CancelFlag,
) -> Result<JudgeOutcome> {
    judge_with_progress(pairs, log_prices, critical_value, config, cancel, |_, _| {})
}

/// Classify every pair, calling `progress(done, total)` after each one.
///
/// Per-pair `SingularDesign` and `InsufficientData` failures are logged and
/// collected when `config.skip_failed_pairs` is set; any other error, or any
/// failure with skipping disabled, aborts the batch. Records come back in
/// input order.
///
/// # Errors
/// `Cancelled` if `cancel` fired before every pair was tested.
pub fn judge_with_progress<F>(
    pairs: &[CorrelationPair],
    log_prices: &LogPriceMatrix,
    critical_value: f64,
    config: &AnalysisConfig,
    cancel: &CancelFlag,
    progress: F,
) -> Result<JudgeOutcome>
where
    F: Fn(usize, usize) + Sync,
{
    let done = AtomicUsize::new(0);
    let results: Vec<Option<Result<CointegrationRecord>>> = pairs
        .par_iter()
        .map(|pair| {
            if cancel.is_cancelled() {
                return None;
            }
            let result = judge_pair(pair, log_prices, critical_value, config.max_adf_lag);
            progress(done.fetch_add(1, Ordering::Relaxed) + 1, pairs.len());
            Some(result)
        })
        .collect();

    let completed = results.iter().filter(|r| r.is_some()).count();
    if completed < pairs.len() {
        return Err(CointegrationError::Cancelled {
            completed,
            total: pairs.len(),
        });
    }

    let mut outcome = JudgeOutcome::default();
    for (pair, result) in pairs.iter().zip(results.into_iter().flatten()) {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(e) if config.skip_failed_pairs && e.is_pair_local() => {
                warn!(pair = %pair.label(), error = %e, "Skipping pair");
                outcome.failures.push(PairFailure {
                    pair: pair.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        tested = outcome.records.len(),
        failed = outcome.failures.len(),
        cointegrated = outcome.records.iter().filter(|r| r.is_cointegrated).count(),
        "Engle-Granger classification complete"
    );

    Ok(outcome)
}
