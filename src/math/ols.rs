//! Ordinary least squares via QR decomposition.
//!
//! Solves `y = X·β + ε` for a dense design matrix. The QR route avoids
//! forming `XᵀX` explicitly, which keeps the fit well conditioned when a
//! regressor sits far from zero (log-prices around 3-6 next to an
//! intercept column of ones).
//!
//! # Mathematical Foundation
//! ```text
//! X = Q·R            (thin QR, R is k×k upper triangular)
//! β̂ = R⁻¹·Qᵀ·y
//! Cov(β̂) = σ̂²·R⁻¹·R⁻ᵀ,  σ̂² = SSR / (n − k)
//! ```

use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

/// Relative tolerance on the diagonal of R below which the design is rank-deficient
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of an OLS fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients, one per design column
    pub params: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// In-sample residuals `y − X·β̂`
    pub residuals: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Number of observations
    pub nobs: usize,
}

impl OlsFit {
    /// t-value of coefficient `idx`
    pub fn t_value(&self, idx: usize) -> f64 {
        self.params[idx] / self.std_errors[idx]
    }

    /// Akaike information criterion from the Gaussian log-likelihood
    pub fn aic(&self) -> f64 {
        let n = self.nobs as f64;
        let k = self.params.len() as f64;
        let llf = -n / 2.0 * ((2.0 * PI).ln() + (self.ssr / n).ln() + 1.0);
        -2.0 * llf + 2.0 * k
    }
}

/// Reasons an OLS fit cannot be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OlsError {
    /// Fewer observations than coefficients (no residual degrees of freedom)
    Underdetermined { nobs: usize, params: usize },
    /// Design matrix does not have full column rank
    RankDeficient,
}

/// Fit `y` on the columns of `design`
pub fn fit(y: &[f64], design: DMatrix<f64>) -> Result<OlsFit, OlsError> {
    let (n, k) = design.shape();
    if n != y.len() || n <= k {
        return Err(OlsError::Underdetermined { nobs: n, params: k });
    }

    let y_vec = DVector::from_column_slice(y);
    let qr = design.clone().qr();
    let r = qr.r();

    let max_diag = r.diagonal().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_diag == 0.0
        || r
            .diagonal()
            .iter()
            .any(|v| v.abs() <= RANK_TOLERANCE * max_diag)
    {
        return Err(OlsError::RankDeficient);
    }

    let qty = qr.q().transpose() * &y_vec;
    let beta = r
        .solve_upper_triangular(&qty)
        .ok_or(OlsError::RankDeficient)?;
    let r_inv = r
        .solve_upper_triangular(&DMatrix::identity(k, k))
        .ok_or(OlsError::RankDeficient)?;

    let residuals = &y_vec - &design * &beta;
    let ssr = residuals.norm_squared();
    let sigma2 = ssr / (n - k) as f64;
    let cov_unscaled = &r_inv * r_inv.transpose();

    let std_errors = (0..k)
        .map(|j| (sigma2 * cov_unscaled[(j, j)]).sqrt())
        .collect();

    Ok(OlsFit {
        params: beta.iter().copied().collect(),
        std_errors,
        residuals: residuals.iter().copied().collect(),
        ssr,
        nobs: n,
    })
}

/// Build a design matrix with a leading intercept column followed by `columns`
pub fn with_intercept(columns: &[&[f64]]) -> DMatrix<f64> {
    let n = columns.first().map_or(0, |c| c.len());
    DMatrix::from_fn(n, columns.len() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            columns[j - 1][i]
        }
    })
}
