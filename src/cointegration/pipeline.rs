//! End-to-end cointegration screen
//!
//! # Pipeline
//! 1. Log-transform the price matrix (aborts on any non-positive price)
//! 2. Correlation pre-filter of candidate pairs
//! 3. Sample-size adjusted critical value, once per run
//! 4. Bidirectional Engle-Granger test and half-life per pair (parallel)
//! 5. Rank by p-value and keep the top N

use super::cancel::CancelFlag;
use super::config::AnalysisConfig;
use super::correlation::filter_pairs;
use super::critical::critical_value;
use super::error::{CointegrationError, Result};
use super::judge::{judge_with_progress, CointegrationRecord, JudgeOutcome, PairFailure};
use super::prices::{transform, PriceMatrix};
use super::ranker::rank;
use serde::Serialize;
use tracing::{debug, info};

/// Pairs between progress log lines
const PROGRESS_INTERVAL: usize = 100;

/// Ranked output of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct RankedSelection {
    /// Records ascending by p-value, at most `top_n`
    pub records: Vec<CointegrationRecord>,
    /// Critical value the statistics were compared against
    pub critical_value: f64,
    /// Rows in the price matrix
    pub observations: usize,
    /// Pairs that passed the correlation filter
    pub candidates: usize,
    /// Pairs skipped because their regression could not be computed
    pub failures: Vec<PairFailure>,
}

impl RankedSelection {
    pub fn cointegrated(&self) -> impl Iterator<Item = &CointegrationRecord> {
        self.records.iter().filter(|r| r.is_cointegrated)
    }
}

/// Run the full screen with a fresh cancel flag
pub fn run_cointegration_analysis(
    prices: &PriceMatrix,
    config: &AnalysisConfig,
) -> Result<RankedSelection> {
    run_cointegration_analysis_with_cancel(prices, config, &CancelFlag::new())
}

/// Run the full screen, checking `cancel` between pairs.
///
/// # Errors
/// - `InvalidConfig` if the configuration fails validation
/// - `InsufficientData` if the matrix has fewer rows than `config.min_observations`
/// - `Domain` if any price is not strictly positive
/// - `Cancelled` if `cancel` fires mid-batch
/// - Per-pair errors only when `config.skip_failed_pairs` is false
pub fn run_cointegration_analysis_with_cancel(
    prices: &PriceMatrix,
    config: &AnalysisConfig,
    cancel: &CancelFlag,
) -> Result<RankedSelection> {
    config.validate().map_err(CointegrationError::InvalidConfig)?;

    if prices.len() < config.min_observations {
        return Err(CointegrationError::InsufficientData {
            expected: config.min_observations,
            actual: prices.len(),
        });
    }

    info!(
        tickers = prices.tickers().len(),
        observations = prices.len(),
        exclusionary = config.exclusionary,
        top_n = config.top_n,
        "Starting cointegration analysis"
    );

    let (log_prices, _log_returns) = transform(prices)?;
    let pairs = filter_pairs(&log_prices, config.exclusionary, config.correlation_threshold);
    let critical = critical_value(prices.len());

    info!(
        candidates = pairs.len(),
        critical_value = format!("{:.4}", critical),
        "Testing candidate pairs"
    );

    let progress = |done: usize, total: usize| {
        if done % PROGRESS_INTERVAL == 0 || done == total {
            debug!(done, total, "Pairs tested");
        }
    };

    let JudgeOutcome { records, failures } = match config.worker_threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| CointegrationError::InvalidConfig(format!("worker pool: {e}")))?;
            pool.install(|| {
                judge_with_progress(&pairs, &log_prices, critical, config, cancel, progress)
            })?
        }
        None => judge_with_progress(&pairs, &log_prices, critical, config, cancel, progress)?,
    };

    let records = rank(records, config.top_n);

    info!(
        ranked = records.len(),
        cointegrated = records.iter().filter(|r| r.is_cointegrated).count(),
        failed = failures.len(),
        "Cointegration analysis complete"
    );

    Ok(RankedSelection {
        records,
        critical_value: critical,
        observations: prices.len(),
        candidates: pairs.len(),
        failures,
    })
}
