//! Cointegration screening for pairs trading
//!
//! Finds ticker pairs whose log-prices are cointegrated using the
//! Engle-Granger two-step method, and ranks them by residual p-value.
//!
//! # Example
//!
//! ```ignore
//! use statarb::cointegration::{run_cointegration_analysis, AnalysisConfig};
//! use statarb::data::{CsvPriceSource, PriceSource};
//!
//! let prices = CsvPriceSource::new("data/nyse_50_stocks.csv").load_price_matrix()?;
//! let config = AnalysisConfig { exclusionary: true, top_n: 5, ..Default::default() };
//! let selection = run_cointegration_analysis(&prices, &config)?;
//! for record in selection.cointegrated() {
//!     println!("{} hedge={:.3}", record.direction, record.hedge_ratio);
//! }
//! ```

pub mod adf;
pub mod cancel;
pub mod config;
pub mod correlation;
pub mod critical;
pub mod error;
pub mod half_life;
pub mod judge;
pub mod pipeline;
pub mod prices;
pub mod ranker;
pub mod regression;

pub use cancel::CancelFlag;
pub use config::AnalysisConfig;
pub use correlation::{filter_pairs, CorrelationPair};
pub use critical::critical_value;
pub use error::CointegrationError;
pub use half_life::{half_life, HalfLife};
pub use judge::{judge, judge_with_progress, CointegrationRecord, PairFailure};
pub use pipeline::{
    run_cointegration_analysis, run_cointegration_analysis_with_cancel, RankedSelection,
};
pub use prices::{transform, LogPriceMatrix, LogReturnMatrix, PriceMatrix};
pub use ranker::rank;
pub use regression::{regress, Direction, RegressionResult};
