//! Ordinary least squares with Gaussian likelihood diagnostics.
//!
//! Every candidate model in a selection run is a plain OLS problem:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! followed by the Gaussian log-likelihood evaluated at the MLE of σ²:
//!
//! ```text
//! llf = -n/2 * (ln(2π) + ln(SSR/n) + 1)
//! AIC = -2 llf + 2k
//! BIC = -2 llf + k ln(n)
//! ```
//!
//! where `k` counts every column of the design matrix (intercept included).
//!
//! Implementation choices:
//! - SVD is used for both the rank check and the solve. Candidate design
//!   matrices are tall and narrow, so the cost is small.
//! - A rank-deficient design is an error, not a pseudo-inverse solution. Scores of
//!   rank-deficient models are not comparable with full-rank ones.

use nalgebra::{DMatrix, DVector};

use crate::error::SelectError;

/// Floor for `SSR / n` so an exact fit still yields a finite likelihood.
const SSR_PER_OBS_FLOOR: f64 = 1e-12;

/// Result of a single OLS fit.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// Coefficients, in design-matrix column order.
    pub params: Vec<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    pub nobs: usize,
    /// Number of estimated coefficients.
    pub n_params: usize,
    /// Gaussian log-likelihood.
    pub llf: f64,
    pub aic: f64,
    pub bic: f64,
}

/// Numerical rank of `x`, using the same tolerance convention as LAPACK-style
/// `matrix_rank`: `max(n, p) * eps * s_max`.
pub fn numerical_rank(x: &DMatrix<f64>) -> usize {
    if x.ncols() == 0 || x.nrows() == 0 {
        return 0;
    }
    let sv = x.clone().singular_values();
    let s_max = sv.iter().copied().fold(0.0_f64, f64::max);
    let tol = (x.nrows().max(x.ncols()) as f64) * f64::EPSILON * s_max;
    sv.iter().filter(|&&s| s > tol).count()
}

/// Fit `y ~ x` by OLS.
///
/// Fails with `SingularFit` when `x` has fewer rows than or as many rows as columns,
/// or when its rank is below its column count, and with `NonFiniteFit` when an input
/// value or the residual sum of squares is not finite.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<OlsFit, SelectError> {
    let n = y.len();
    let p = x.ncols();
    if n == 0 {
        return Err(SelectError::EmptyDataset);
    }
    if !y.iter().chain(x.iter()).all(|v| v.is_finite()) {
        return Err(SelectError::NonFiniteFit {
            columns: p,
            ssr: f64::NAN,
        });
    }

    // No regressors at all: the "model" predicts zero.
    if p == 0 {
        let ssr = y.iter().map(|v| v * v).sum();
        return likelihood_summary(Vec::new(), ssr, n);
    }

    if n <= p {
        return Err(SelectError::SingularFit {
            columns: p,
            rank: numerical_rank(x).min(n),
            nobs: n,
        });
    }

    let svd = x.clone().svd(true, true);
    let s_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = (n.max(p) as f64) * f64::EPSILON * s_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    if rank < p {
        return Err(SelectError::SingularFit {
            columns: p,
            rank,
            nobs: n,
        });
    }

    let beta = svd.solve(y, tol).map_err(|_| SelectError::SingularFit {
        columns: p,
        rank,
        nobs: n,
    })?;

    let resid = y - x * &beta;
    let ssr = resid.dot(&resid);

    likelihood_summary(beta.iter().copied().collect(), ssr, n)
}

fn likelihood_summary(params: Vec<f64>, ssr: f64, n: usize) -> Result<OlsFit, SelectError> {
    // The floor below would turn a NaN SSR into a perfect fit.
    if !ssr.is_finite() {
        return Err(SelectError::NonFiniteFit {
            columns: params.len(),
            ssr,
        });
    }

    let n_f = n as f64;
    let k = params.len();
    let k_f = k as f64;
    let ssr_per = (ssr / n_f).max(SSR_PER_OBS_FLOOR);
    let llf = -0.5 * n_f * ((2.0 * std::f64::consts::PI).ln() + ssr_per.ln() + 1.0);

    Ok(OlsFit {
        params,
        ssr,
        nobs: n,
        n_params: k,
        llf,
        aic: -2.0 * llf + 2.0 * k_f,
        bic: -2.0 * llf + k_f * n_f.ln(),
    })
}
