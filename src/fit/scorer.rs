//! The scoring seam between the search loop and model fitting.
//!
//! The selector only needs one thing from a model fitter: given a response
//! vector and a set of predictor columns, return a fitted model whose criterion
//! value is comparable across candidates fit on the same response.

use nalgebra::{DMatrix, DVector};

use crate::error::SelectError;
use crate::math::{OlsFit, fit_ols};

/// Fits a linear model for one candidate variable set.
///
/// Implementations must be deterministic: identical inputs give identical scores.
/// A rank-deficient design must fail with `SelectError::SingularFit`.
pub trait Scorer: Sync {
    fn fit(&self, y: &[f64], columns: &[&[f64]], add_intercept: bool)
    -> Result<OlsFit, SelectError>;
}

/// Dense OLS scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsScorer;

impl Scorer for OlsScorer {
    fn fit(
        &self,
        y: &[f64],
        columns: &[&[f64]],
        add_intercept: bool,
    ) -> Result<OlsFit, SelectError> {
        let x = design_matrix(y.len(), columns, add_intercept)?;
        let y = DVector::from_column_slice(y);
        fit_ols(&x, &y)
    }
}

/// Assemble `[1 | columns...]` (or just `columns` without the intercept).
pub fn design_matrix(
    n: usize,
    columns: &[&[f64]],
    add_intercept: bool,
) -> Result<DMatrix<f64>, SelectError> {
    for (j, col) in columns.iter().enumerate() {
        if col.len() != n {
            return Err(SelectError::LengthMismatch {
                name: format!("column #{j}"),
                expected: n,
                actual: col.len(),
            });
        }
    }

    let offset = usize::from(add_intercept);
    let p = columns.len() + offset;
    Ok(DMatrix::from_fn(n, p, |i, j| {
        if j < offset { 1.0 } else { columns[j - offset][i] }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intercept_column_is_prepended() {
        let a = [2.0, 3.0];
        let x = design_matrix(2, &[&a], true).unwrap();
        assert_eq!(x.ncols(), 2);
        assert_eq!(x[(0, 0)], 1.0);
        assert_eq!(x[(1, 1)], 3.0);
    }

    #[test]
    fn intercept_only_model_fits() {
        let y = [1.0, 2.0, 3.0, 6.0];
        let fit = OlsScorer.fit(&y, &[], true).unwrap();
        assert_eq!(fit.n_params, 1);
        assert!((fit.params[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_predictors_fail() {
        let y = [1.0, 2.0, 3.0, 6.0, 4.0];
        let a = [0.1, 0.4, 0.2, 0.9, 0.5];
        let b: Vec<f64> = a.iter().map(|v| 3.0 * v).collect();
        let err = OlsScorer.fit(&y, &[&a, &b], true).unwrap_err();
        assert!(matches!(err, SelectError::SingularFit { columns: 3, .. }));
    }

    #[test]
    fn ragged_column_is_rejected() {
        let y = [1.0, 2.0, 3.0];
        let a = [1.0, 2.0];
        assert!(matches!(
            OlsScorer.fit(&y, &[&a], true),
            Err(SelectError::LengthMismatch { .. })
        ));
    }
}
