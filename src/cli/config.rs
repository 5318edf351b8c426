//! CLI configuration structs bridging CLI arguments to domain types.

use crate::cointegration::{AnalysisConfig, CointegrationError};
use crate::data::{CsvPriceSource, PriceSource, SyntheticPriceSource};

/// Where the price history comes from
#[derive(Debug, Clone)]
pub enum PriceInput {
    Csv(String),
    Synthetic {
        tickers: usize,
        observations: usize,
        seed: u64,
    },
}

impl PriceInput {
    /// Build the matching price source
    pub fn source(&self, min_rows: usize) -> Box<dyn PriceSource + Send> {
        match self {
            Self::Csv(path) => Box::new(CsvPriceSource::new(path).with_min_rows(min_rows)),
            Self::Synthetic {
                tickers,
                observations,
                seed,
            } => Box::new(SyntheticPriceSource {
                tickers: *tickers,
                observations: *observations,
                seed: *seed,
                ..Default::default()
            }),
        }
    }
}

/// CLI configuration for the `analyze` command.
#[derive(Debug, Clone)]
pub struct AnalyzeCliConfig {
    pub input: PriceInput,
    /// Optional JSON config file, loaded before flag overrides
    pub config_path: Option<String>,
    pub exclusionary: bool,
    pub correlation_threshold: Option<f64>,
    pub top_n: Option<usize>,
    pub workers: Option<usize>,
    pub output: Option<String>,
}

impl AnalyzeCliConfig {
    /// Resolve the analysis config: file (or defaults), then flag overrides.
    ///
    /// # Errors
    /// Returns `CointegrationError` if the file cannot be read or the result is invalid.
    pub fn analysis_config(&self) -> Result<AnalysisConfig, CointegrationError> {
        let mut config = match &self.config_path {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        if self.exclusionary {
            config.exclusionary = true;
        }
        if let Some(threshold) = self.correlation_threshold {
            config.correlation_threshold = threshold;
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if self.workers.is_some() {
            config.worker_threads = self.workers;
        }

        config.validate().map_err(CointegrationError::InvalidConfig)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_config() -> AnalyzeCliConfig {
        AnalyzeCliConfig {
            input: PriceInput::Synthetic {
                tickers: 4,
                observations: 100,
                seed: 1,
            },
            config_path: None,
            exclusionary: false,
            correlation_threshold: None,
            top_n: None,
            workers: None,
            output: None,
        }
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = cli_config().analysis_config().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_flags_override() {
        let cli = AnalyzeCliConfig {
            exclusionary: true,
            correlation_threshold: Some(0.8),
            top_n: Some(3),
            workers: Some(2),
            ..cli_config()
        };
        let config = cli.analysis_config().unwrap();
        assert!(config.exclusionary);
        assert_eq!(config.correlation_threshold, 0.8);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.worker_threads, Some(2));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = AnalyzeCliConfig {
            workers: Some(0),
            ..cli_config()
        };
        assert!(cli.analysis_config().is_err());
    }
}
