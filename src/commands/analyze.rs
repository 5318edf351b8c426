//! Cointegration analysis command handler.
//!
//! Implements the `analyze` subcommand: load prices, screen pairs, print the
//! ranked table and optionally export it as JSON.

use crate::cli::AnalyzeCliConfig;
use crate::cointegration::{
    run_cointegration_analysis_with_cancel, AnalysisConfig, CancelFlag, CointegrationRecord,
    HalfLife, RankedSelection,
};
use crate::data::PriceSource;

use serde::Serialize;
use std::error::Error;
use tracing::{error, info, warn};

type BoxError = Box<dyn Error + Send + Sync>;

/// One exported row of the ranked selection
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub rank: usize,
    pub pair: String,
    pub direction: String,
    pub correlation: f64,
    pub hedge_ratio: f64,
    pub intercept: f64,
    pub p_value: f64,
    pub t_statistic: f64,
    pub is_cointegrated: bool,
    /// Periods; `null` when infinite
    pub half_life: Option<f64>,
    pub half_life_status: &'static str,
}

impl ReportRow {
    fn from_record(rank: usize, record: &CointegrationRecord) -> Self {
        let (half_life, half_life_status) = match record.half_life {
            HalfLife::Finite { periods } => (Some(periods), "finite"),
            HalfLife::NotCointegrated => (None, "not_cointegrated"),
            HalfLife::NonMeanReverting { .. } => (None, "non_mean_reverting"),
        };
        Self {
            rank,
            pair: record.pair.label(),
            direction: record.direction.to_string(),
            correlation: record.pair.correlation,
            hedge_ratio: record.hedge_ratio,
            intercept: record.intercept,
            p_value: record.p_value,
            t_statistic: record.t_statistic,
            is_cointegrated: record.is_cointegrated,
            half_life,
            half_life_status,
        }
    }
}

/// Flatten a selection into export rows, rank starting at 1
pub fn report_rows(selection: &RankedSelection) -> Vec<ReportRow> {
    selection
        .records
        .iter()
        .enumerate()
        .map(|(i, r)| ReportRow::from_record(i + 1, r))
        .collect()
}

/// Load prices from `source` and run the screen.
///
/// # Errors
/// Returns the data error or the matrix-level analysis error.
pub fn analyze(
    source: &dyn PriceSource,
    config: &AnalysisConfig,
    cancel: &CancelFlag,
) -> Result<RankedSelection, BoxError> {
    let prices = source.load_price_matrix()?;
    Ok(run_cointegration_analysis_with_cancel(&prices, config, cancel)?)
}

/// Run the `analyze` subcommand.
///
/// The numeric work runs on the blocking pool; Ctrl-C stops it between pairs.
///
/// # Errors
/// Returns error if loading, analysis, or writing the output fails.
pub async fn run_analyze(cli_config: AnalyzeCliConfig) -> Result<(), Box<dyn Error>> {
    info!("--- statarb: Cointegration Screen ---");

    let config = cli_config.analysis_config()?;
    let source = cli_config.input.source(config.min_observations);

    info!(
        input = ?cli_config.input,
        exclusionary = config.exclusionary,
        threshold = config.correlation_threshold,
        top_n = config.top_n,
        "Configuration loaded"
    );

    let cancel = CancelFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight pairs");
            signal_flag.cancel();
        }
    });

    let worker_config = config.clone();
    let selection = tokio::task::spawn_blocking(move || {
        analyze(source.as_ref(), &worker_config, &cancel)
    })
    .await?;

    let selection = match selection {
        Ok(selection) => selection,
        Err(e) => {
            error!("Analysis failed: {}", e);
            let e: Box<dyn Error> = e;
            return Err(e);
        }
    };

    print_table(&selection);

    for failure in &selection.failures {
        warn!(pair = %failure.pair.label(), reason = %failure.reason, "Pair excluded");
    }

    if let Some(path) = &cli_config.output {
        let json = serde_json::to_string_pretty(&report_rows(&selection))?;
        std::fs::write(path, &json)?;
        info!(output = %path, pairs = selection.records.len(), "Results saved");
    }

    Ok(())
}

fn print_table(selection: &RankedSelection) {
    println!(
        "\nCritical value {:.4} over {} observations, {} candidate pairs, {} skipped, {} cointegrated in top {}",
        selection.critical_value,
        selection.observations,
        selection.candidates,
        selection.failures.len(),
        selection.cointegrated().count(),
        selection.records.len()
    );
    println!(
        "\n{:>4} | {:<16} | {:>6} | {:>8} | {:>8} | {:>8} | {:>5} | {:>10}",
        "Rank", "Direction", "Corr", "Hedge", "p", "t", "Coint", "Half-life"
    );
    println!("{}", "-".repeat(88));

    for row in report_rows(selection) {
        let half_life = match row.half_life {
            Some(h) => format!("{h:.2}"),
            None if row.half_life_status == "non_mean_reverting" => "n/a (λ≥0)".to_string(),
            None => "inf".to_string(),
        };
        println!(
            "{:>4} | {:<16} | {:>6.3} | {:>8.4} | {:>8.4} | {:>8.3} | {:>5} | {:>10}",
            row.rank,
            row.direction,
            row.correlation,
            row.hedge_ratio,
            row.p_value,
            row.t_statistic,
            if row.is_cointegrated { "yes" } else { "no" },
            half_life
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataError, MockPriceSource, SyntheticPriceSource};

    #[test]
    fn test_analyze_uses_source() {
        let prices = SyntheticPriceSource {
            tickers: 4,
            observations: 300,
            group_size: 2,
            seed: 3,
        }
        .load_price_matrix()
        .unwrap();

        let mut source = MockPriceSource::new();
        source
            .expect_load_price_matrix()
            .times(1)
            .return_once(move || Ok(prices));

        let config = AnalysisConfig {
            top_n: 2,
            ..Default::default()
        };
        let selection = analyze(&source, &config, &CancelFlag::new()).unwrap();
        assert_eq!(selection.candidates, 6);
        assert_eq!(selection.records.len(), 2);

        let rows = report_rows(&selection);
        assert_eq!(rows[0].rank, 1);
        assert!(rows[0].p_value <= rows[1].p_value);
    }

    #[test]
    fn test_analyze_propagates_source_error() {
        let mut source = MockPriceSource::new();
        source
            .expect_load_price_matrix()
            .returning(|| Err(DataError::EmptyColumn("every column is empty".into())));

        let result = analyze(&source, &AnalysisConfig::default(), &CancelFlag::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_report_row_half_life_status() {
        let mut record = crate::cointegration::ranker::tests::record("k", 0.01);
        record.is_cointegrated = true;
        record.half_life = HalfLife::NonMeanReverting { lambda: 0.02 };
        let row = ReportRow::from_record(1, &record);
        assert_eq!(row.half_life, None);
        assert_eq!(row.half_life_status, "non_mean_reverting");
        assert_eq!(row.pair, "kA/kB");
    }
}
