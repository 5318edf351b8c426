//! Configuration for a cointegration analysis run

use super::correlation::DEFAULT_CORRELATION_THRESHOLD;
use super::error::CointegrationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the screening pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Only test pairs whose log-price correlation exceeds the threshold
    #[serde(default)]
    pub exclusionary: bool,

    /// Correlation threshold for the exclusionary filter
    #[serde(default = "default_correlation_threshold")]
    pub correlation_threshold: f64,

    /// Maximum number of pairs in the ranked output
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Log and skip pairs whose regression cannot be computed instead of aborting
    #[serde(default = "default_skip_failed_pairs")]
    pub skip_failed_pairs: bool,

    /// Dedicated worker pool size; `None` uses the global pool (one thread per core)
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Upper bound on the ADF lag search; `None` uses the sample-size rule
    #[serde(default)]
    pub max_adf_lag: Option<usize>,

    /// Minimum rows in the price matrix
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,
}

// Default value functions for serde
fn default_correlation_threshold() -> f64 {
    DEFAULT_CORRELATION_THRESHOLD
}
fn default_top_n() -> usize {
    10
}
fn default_skip_failed_pairs() -> bool {
    true
}
fn default_min_observations() -> usize {
    super::adf::MIN_ADF_OBSERVATIONS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclusionary: false,
            correlation_threshold: default_correlation_threshold(),
            top_n: default_top_n(),
            skip_failed_pairs: default_skip_failed_pairs(),
            worker_threads: None,
            max_adf_lag: None,
            min_observations: default_min_observations(),
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CointegrationError> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate().map_err(CointegrationError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(-1.0..=1.0).contains(&self.correlation_threshold) {
            return Err(format!(
                "correlation_threshold must be between -1.0 and 1.0, got {}",
                self.correlation_threshold
            ));
        }
        if self.worker_threads == Some(0) {
            return Err("worker_threads must be at least 1".to_string());
        }
        if self.min_observations < super::adf::MIN_ADF_OBSERVATIONS {
            return Err(format!(
                "min_observations must be at least {}, got {}",
                super::adf::MIN_ADF_OBSERVATIONS,
                self.min_observations
            ));
        }
        Ok(())
    }
}
