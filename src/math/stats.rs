//! Descriptive statistics over plain `f64` slices.

/// Arithmetic mean, or `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate Pearson correlation coefficient between two series
///
/// Returns a value in [-1.0, 1.0], or None if the series differ in length,
/// have fewer than two points, or the result is not finite. A zero-variance
/// series has no defined correlation and is reported as 0.0.
///
/// # Mathematical Definition
/// r = Σ[(xi - x̄)(yi - ȳ)] / √[Σ(xi - x̄)² × Σ(yi - ȳ)²]
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }

    let mean_a = mean(a)?;
    let mean_b = mean(b)?;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return Some(0.0);
    }

    let correlation = covariance / (var_a.sqrt() * var_b.sqrt());

    if correlation.is_finite() {
        // Rounding can push |r| a hair past 1
        Some(correlation.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Whether every value in the slice is the same (zero sample variance)
pub fn is_constant(values: &[f64]) -> bool {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    values.is_empty() || max - min <= f64::EPSILON * max.abs().max(min.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_perfect() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let corr = pearson_correlation(&a, &b).unwrap();
        assert!((corr - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_correlation_negative() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![5.0, 4.0, 3.0, 2.0, 1.0];
        let corr = pearson_correlation(&a, &b).unwrap();
        assert!((corr + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_correlation_symmetric() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![1.5, 2.5, 2.8, 4.2, 4.9];
        let corr_ab = pearson_correlation(&a, &b).unwrap();
        let corr_ba = pearson_correlation(&b, &a).unwrap();
        assert!((corr_ab - corr_ba).abs() < 0.0001);
    }

    #[test]
    fn test_correlation_zero_variance() {
        let a = vec![2.0; 5];
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(pearson_correlation(&a, &b), Some(0.0));
    }

    #[test]
    fn test_correlation_length_mismatch() {
        assert_eq!(pearson_correlation(&[1.0, 2.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_is_constant() {
        assert!(is_constant(&[4.2, 4.2, 4.2]));
        assert!(!is_constant(&[4.2, 4.2, 4.3]));
    }
}
