//! Correlation pre-filter for candidate pairs
//!
//! Computes the Pearson correlation of every unordered pair of log-price
//! columns and keeps the pairs worth running through Engle-Granger.

use super::prices::LogPriceMatrix;
use crate::math::pearson_correlation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default correlation threshold for the exclusionary filter
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.7;

/// An unordered ticker pair with its log-price correlation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    /// First ticker in column order
    pub ticker_a: String,
    /// Second ticker in column order
    pub ticker_b: String,
    /// Pearson correlation of the log-prices, in [-1, 1]
    pub correlation: f64,
}

impl CorrelationPair {
    /// Display label, e.g. `KO/PEP`
    pub fn label(&self) -> String {
        format!("{}/{}", self.ticker_a, self.ticker_b)
    }
}

/// Select candidate pairs from the log-price correlation matrix.
///
/// Self-pairs are never emitted and each unordered pair appears once, in
/// column order (`i < j`).
///
/// When `exclusionary` is true only pairs with correlation strictly above
/// `threshold` survive. The comparison is on the signed coefficient, so
/// strongly negatively correlated pairs are dropped too. When false every
/// off-diagonal pair is returned and `threshold` is ignored.
pub fn filter_pairs(
    log_prices: &LogPriceMatrix,
    exclusionary: bool,
    threshold: f64,
) -> Vec<CorrelationPair> {
    let tickers = log_prices.tickers();
    let mut pairs = Vec::new();
    let mut rejected = 0usize;

    for i in 0..tickers.len() {
        for j in (i + 1)..tickers.len() {
            let correlation =
                pearson_correlation(log_prices.column_at(i), log_prices.column_at(j))
                    .unwrap_or(0.0);

            if exclusionary && correlation <= threshold {
                debug!(
                    pair = format!("{}/{}", tickers[i], tickers[j]),
                    corr = format!("{:.3}", correlation),
                    "Correlation too low"
                );
                rejected += 1;
                continue;
            }

            pairs.push(CorrelationPair {
                ticker_a: tickers[i].clone(),
                ticker_b: tickers[j].clone(),
                correlation,
            });
        }
    }

    info!(
        tickers = tickers.len(),
        candidates = pairs.len(),
        rejected,
        exclusionary,
        threshold,
        "Correlation filter complete"
    );

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cointegration::prices::tests::dates;

    fn log_matrix(columns: Vec<(&str, Vec<f64>)>) -> LogPriceMatrix {
        let n = columns[0].1.len();
        let (tickers, cols): (Vec<_>, Vec<_>) = columns
            .into_iter()
            .map(|(t, c)| (t.to_string(), c))
            .unzip();
        LogPriceMatrix::new(dates(n), tickers, cols).unwrap()
    }

    fn sample() -> LogPriceMatrix {
        log_matrix(vec![
            ("UP", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("UP2", vec![1.1, 2.0, 3.2, 3.9, 5.1]),
            ("DOWN", vec![5.0, 4.0, 3.0, 2.0, 1.0]),
            ("FLAT", vec![3.0, 1.0, 3.0, 1.0, 3.0]),
        ])
    }

    #[test]
    fn test_exclusionary_keeps_only_high_positive() {
        let pairs = filter_pairs(&sample(), true, 0.7);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].ticker_a, "UP");
        assert_eq!(pairs[0].ticker_b, "UP2");
        assert!(pairs[0].correlation > 0.7);
    }

    #[test]
    fn test_negative_correlation_excluded() {
        let pairs = filter_pairs(&sample(), true, 0.7);
        assert!(!pairs
            .iter()
            .any(|p| p.ticker_a == "DOWN" || p.ticker_b == "DOWN"));
    }

    #[test]
    fn test_non_exclusionary_returns_all_unordered_pairs() {
        let pairs = filter_pairs(&sample(), false, 0.7);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().all(|p| p.ticker_a != p.ticker_b));
        for (i, p) in pairs.iter().enumerate() {
            for q in &pairs[i + 1..] {
                let same = (p.ticker_a == q.ticker_a && p.ticker_b == q.ticker_b)
                    || (p.ticker_a == q.ticker_b && p.ticker_b == q.ticker_a);
                assert!(!same, "pair {} emitted twice", p.label());
            }
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let m = log_matrix(vec![
            ("A", vec![1.0, 2.0, 3.0]),
            ("B", vec![2.0, 4.0, 6.0]),
        ]);
        // Correlation is exactly 1.0 here
        assert!(filter_pairs(&m, true, 1.0).is_empty());
        assert_eq!(filter_pairs(&m, true, 0.99).len(), 1);
    }
}
