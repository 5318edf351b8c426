//! Price matrices and the log transform
//!
//! A [`PriceMatrix`] is a date axis plus one aligned column per ticker.
//! [`transform`] derives the log-price and log-return matrices that the rest
//! of the pipeline consumes.

use super::error::{CointegrationError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::ops::Deref;
use tracing::debug;

/// Ticker columns aligned to an ascending date axis
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMatrix {
    index: Vec<NaiveDate>,
    tickers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SeriesMatrix {
    /// Validate and build a matrix.
    ///
    /// # Errors
    /// `MalformedMatrix` if tickers repeat, dates are not strictly ascending,
    /// a column length differs from the index, or any value is not finite.
    pub fn new(index: Vec<NaiveDate>, tickers: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if tickers.len() != columns.len() {
            return Err(CointegrationError::MalformedMatrix(format!(
                "{} tickers but {} columns",
                tickers.len(),
                columns.len()
            )));
        }

        let mut seen = HashSet::with_capacity(tickers.len());
        for ticker in &tickers {
            if !seen.insert(ticker.as_str()) {
                return Err(CointegrationError::MalformedMatrix(format!(
                    "duplicate ticker {ticker}"
                )));
            }
        }

        if let Some(pos) = index.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CointegrationError::MalformedMatrix(format!(
                "dates not strictly ascending at row {}",
                pos + 1
            )));
        }

        for (ticker, column) in tickers.iter().zip(&columns) {
            if column.len() != index.len() {
                return Err(CointegrationError::MalformedMatrix(format!(
                    "{ticker} has {} values for {} dates",
                    column.len(),
                    index.len()
                )));
            }
            if let Some(row) = column.iter().position(|v| !v.is_finite()) {
                return Err(CointegrationError::MalformedMatrix(format!(
                    "{ticker} has a missing or non-finite value at row {row}"
                )));
            }
        }

        Ok(Self {
            index,
            tickers,
            columns,
        })
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of observations (rows)
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Column by position
    pub fn column_at(&self, idx: usize) -> &[f64] {
        &self.columns[idx]
    }

    /// Column by ticker symbol
    pub fn column(&self, ticker: &str) -> Option<&[f64]> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterate `(ticker, column)` in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    fn map_columns(&self, f: impl Fn(&[f64]) -> Vec<f64>) -> Self {
        Self {
            index: self.index.clone(),
            tickers: self.tickers.clone(),
            columns: self.columns.iter().map(|c| f(c)).collect(),
        }
    }
}

macro_rules! matrix_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(SeriesMatrix);

        impl Deref for $name {
            type Target = SeriesMatrix;

            fn deref(&self) -> &SeriesMatrix {
                &self.0
            }
        }
    };
}

matrix_newtype!(
    /// Raw prices, owned by the orchestrator for one analysis run
    PriceMatrix
);
matrix_newtype!(
    /// Elementwise natural log of a [`PriceMatrix`]
    LogPriceMatrix
);
matrix_newtype!(
    /// First difference of a [`LogPriceMatrix`]; row 0 is zero
    LogReturnMatrix
);

impl PriceMatrix {
    /// See [`SeriesMatrix::new`]
    pub fn new(index: Vec<NaiveDate>, tickers: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        SeriesMatrix::new(index, tickers, columns).map(Self)
    }
}

impl LogPriceMatrix {
    /// Wrap already log-transformed columns (tests and callers holding log data)
    pub fn new(index: Vec<NaiveDate>, tickers: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        SeriesMatrix::new(index, tickers, columns).map(Self)
    }
}

/// Convert prices into log-prices and log-returns.
///
/// Log-return at row 0 is 0 for every ticker so both outputs keep the row
/// count of the input.
///
/// # Errors
/// `Domain` on the first price that is not strictly positive.
pub fn transform(prices: &PriceMatrix) -> Result<(LogPriceMatrix, LogReturnMatrix)> {
    for (ticker, column) in prices.iter() {
        if let Some(row) = column.iter().position(|p| *p <= 0.0) {
            return Err(CointegrationError::Domain {
                ticker: ticker.to_string(),
                row,
                price: column[row],
            });
        }
    }

    let log_prices = prices.map_columns(|c| c.iter().map(|p| p.ln()).collect());
    let log_returns = log_prices.map_columns(|c| {
        let mut out = Vec::with_capacity(c.len());
        if !c.is_empty() {
            out.push(0.0);
        }
        out.extend(c.windows(2).map(|w| w[1] - w[0]));
        out
    });

    debug!(
        tickers = prices.tickers().len(),
        observations = prices.len(),
        "Log transform complete"
    );

    Ok((LogPriceMatrix(log_prices), LogReturnMatrix(log_returns)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn matrix(columns: Vec<(&str, Vec<f64>)>) -> PriceMatrix {
        let n = columns[0].1.len();
        let (tickers, cols): (Vec<_>, Vec<_>) = columns
            .into_iter()
            .map(|(t, c)| (t.to_string(), c))
            .unzip();
        PriceMatrix::new(dates(n), tickers, cols).unwrap()
    }

    #[test]
    fn test_log_prices_and_returns() {
        let prices = matrix(vec![
            ("AAA", vec![100.0, 110.0, 99.0]),
            ("BBB", vec![50.0, 50.0, 25.0]),
        ]);
        let (logp, logr) = transform(&prices).unwrap();

        assert_relative_eq!(logp.column("AAA").unwrap()[1], 110.0_f64.ln());
        assert_eq!(logr.column("AAA").unwrap()[0], 0.0);
        assert_eq!(logr.column("BBB").unwrap()[0], 0.0);
        assert_relative_eq!(
            logr.column("AAA").unwrap()[2],
            (99.0_f64 / 110.0).ln(),
            epsilon = 1e-12
        );
        assert_relative_eq!(logr.column("BBB").unwrap()[2], -(2.0_f64.ln()), epsilon = 1e-12);
        assert_eq!(logr.len(), prices.len());
    }

    #[test]
    fn test_non_positive_price_is_domain_error() {
        let prices = matrix(vec![("AAA", vec![1.0, 0.0, 2.0])]);
        match transform(&prices) {
            Err(CointegrationError::Domain { ticker, row, .. }) => {
                assert_eq!(ticker, "AAA");
                assert_eq!(row, 1);
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        let result = PriceMatrix::new(
            dates(2),
            vec!["AAA".into(), "AAA".into()],
            vec![vec![1.0, 2.0], vec![1.0, 2.0]],
        );
        assert!(matches!(result, Err(CointegrationError::MalformedMatrix(_))));
    }

    #[test]
    fn test_unsorted_index_rejected() {
        let mut index = dates(3);
        index.swap(1, 2);
        let result = PriceMatrix::new(index, vec!["AAA".into()], vec![vec![1.0, 2.0, 3.0]]);
        assert!(matches!(result, Err(CointegrationError::MalformedMatrix(_))));
    }

    #[test]
    fn test_nan_rejected() {
        let result = PriceMatrix::new(dates(2), vec!["AAA".into()], vec![vec![1.0, f64::NAN]]);
        assert!(matches!(result, Err(CointegrationError::MalformedMatrix(_))));
    }
}
