//! Deterministic synthetic price history
//!
//! Tickers are generated in groups that share one log random walk, each
//! member adding its own small noise, so every group is cointegrated by
//! construction while different groups are independent.
//!
//! Seeded, so runs are reproducible without a data file.

use super::{DataError, PriceSource};
use crate::cointegration::PriceMatrix;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::info;

/// Daily volatility of the shared log random walk
const WALK_VOLATILITY: f64 = 0.01;
/// Volatility of each ticker's idiosyncratic noise around the shared walk
const NOISE_VOLATILITY: f64 = 0.002;

/// Generates cointegrated ticker groups
#[derive(Debug, Clone)]
pub struct SyntheticPriceSource {
    pub tickers: usize,
    pub observations: usize,
    /// Tickers sharing one random walk
    pub group_size: usize,
    pub seed: u64,
}

impl Default for SyntheticPriceSource {
    fn default() -> Self {
        Self {
            tickers: 6,
            observations: 1500,
            group_size: 2,
            seed: 42,
        }
    }
}

impl PriceSource for SyntheticPriceSource {
    fn load_price_matrix(&self) -> Result<PriceMatrix, DataError> {
        let group_size = self.group_size.max(1);
        info!(
            tickers = self.tickers,
            observations = self.observations,
            group_size,
            seed = self.seed,
            "Generating synthetic prices"
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let step = Normal::new(0.0, WALK_VOLATILITY)
            .map_err(|e| DataError::Synthetic(format!("walk distribution: {e}")))?;
        let noise = Normal::new(0.0, NOISE_VOLATILITY)
            .map_err(|e| DataError::Synthetic(format!("noise distribution: {e}")))?;
        let groups = self.tickers.div_ceil(group_size);
        let walks: Vec<Vec<f64>> = (0..groups)
            .map(|_| {
                let mut level = 0.0;
                (0..self.observations)
                    .map(|_| {
                        level += step.sample(&mut rng);
                        level
                    })
                    .collect()
            })
            .collect();

        let mut tickers = Vec::with_capacity(self.tickers);
        let mut columns = Vec::with_capacity(self.tickers);
        for t in 0..self.tickers {
            let group = t / group_size;
            let base = (20.0 + 15.0 * t as f64).ln();
            let column = walks[group]
                .iter()
                .map(|w| (base + w + noise.sample(&mut rng)).exp())
                .collect();
            tickers.push(format!("SYN{}_{}", group, t % group_size));
            columns.push(column);
        }

        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .ok_or_else(|| DataError::DateParse("invalid synthetic start date".to_string()))?;
        let index = (0..self.observations)
            .map(|i| start + Duration::days(i as i64))
            .collect();

        Ok(PriceMatrix::new(index, tickers, columns)?)
    }
}
