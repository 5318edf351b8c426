//! Top-N selection by p-value

use super::judge::CointegrationRecord;
use std::cmp::Ordering;

/// Stable sort ascending by p-value and keep the first `n` records.
///
/// `n == 0` yields an empty selection.
pub fn rank(mut records: Vec<CointegrationRecord>, n: usize) -> Vec<CointegrationRecord> {
    records.sort_by(|a, b| a.p_value.partial_cmp(&b.p_value).unwrap_or(Ordering::Equal));
    records.truncate(n);
    records
}
