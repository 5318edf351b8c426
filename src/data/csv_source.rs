//! Wide CSV price history loader
//!
//! Expects a header `Date,<ticker>,<ticker>,...` and one row per date.
//! Empty cells are gaps: each column is forward-filled and then back-filled,
//! and columns with no values at all are dropped.

use super::{DataError, PriceSource};
use crate::cointegration::PriceMatrix;
use chrono::NaiveDate;
use csv::Reader;
use std::path::PathBuf;
use tracing::{info, warn};

/// Loads a [`PriceMatrix`] from a wide CSV file
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
    min_rows: usize,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            min_rows: 1,
        }
    }

    /// Reject files with fewer data rows than `min_rows`
    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }
}

impl PriceSource for CsvPriceSource {
    fn load_price_matrix(&self) -> Result<PriceMatrix, DataError> {
        info!(path = %self.path.display(), "Loading price history");

        let mut reader = Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let tickers: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

        let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result?;
            let date = parse_date(record.get(0).unwrap_or(""), line + 2)?;
            let values = (1..=tickers.len())
                .map(|col| parse_cell(record.get(col).unwrap_or(""), &tickers[col - 1], line + 2))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push((date, values));
        }

        if rows.len() < self.min_rows {
            return Err(DataError::TooFewRows {
                expected: self.min_rows,
                actual: rows.len(),
            });
        }

        rows.sort_by_key(|(date, _)| *date);

        let index: Vec<NaiveDate> = rows.iter().map(|(d, _)| *d).collect();
        let mut kept_tickers = Vec::with_capacity(tickers.len());
        let mut columns = Vec::with_capacity(tickers.len());

        for (col, ticker) in tickers.iter().enumerate() {
            let raw: Vec<Option<f64>> = rows.iter().map(|(_, values)| values[col]).collect();
            match fill_gaps(&raw) {
                Some(filled) => {
                    kept_tickers.push(ticker.clone());
                    columns.push(filled);
                }
                None => warn!(ticker = %ticker, "Column has no prices, dropping"),
            }
        }

        if kept_tickers.is_empty() {
            return Err(DataError::EmptyColumn("every column is empty".to_string()));
        }

        info!(
            tickers = kept_tickers.len(),
            rows = index.len(),
            "Price history loaded"
        );

        Ok(PriceMatrix::new(index, kept_tickers, columns)?)
    }
}

/// Parse `YYYY-MM-DD`, ignoring any trailing time component
fn parse_date(raw: &str, line: usize) -> Result<NaiveDate, DataError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DataError::DateParse(format!("line {line}: '{trimmed}': {e}")))
}

fn parse_cell(raw: &str, ticker: &str, line: usize) -> Result<Option<f64>, DataError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| DataError::InvalidPrice {
            ticker: ticker.to_string(),
            line,
            value: trimmed.to_string(),
        })
}

/// Forward-fill then back-fill; `None` if the column has no values
pub(crate) fn fill_gaps(raw: &[Option<f64>]) -> Option<Vec<f64>> {
    let first = raw.iter().flatten().next().copied()?;
    let mut last = first;
    Some(
        raw.iter()
            .map(|v| {
                if let Some(v) = v {
                    last = *v;
                }
                last
            })
            .collect(),
    )
}
