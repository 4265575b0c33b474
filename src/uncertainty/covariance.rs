//! Covariance estimates from the fitted normal equations.
//!
//! The driver itself returns only parameters and chi-squared; parameter
//! errors are derived afterwards from the undamped normal-equations matrix
//! at the solution, inverted with the same Gauss-Jordan routine the driver
//! uses for its steps.

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};
use crate::lm::{gauss_jordan, normal_equations};

/// Covariance matrix of the fitted parameters.
///
/// Builds the undamped (lambda = 0) `A` matrix from the Jacobian at the
/// solution and the measurement errors, then inverts it column by column.
///
/// # Errors
///
/// * [`FitError::DimensionMismatch`] if `errors` does not match the
///   Jacobian's row count.
/// * [`FitError::SingularMatrix`] if the normal matrix is not invertible,
///   i.e. the parameters are not locally identifiable.
pub fn covariance(jacobian: &Array2<f64>, errors: &Array1<f64>) -> Result<Array2<f64>> {
    let n_obs = jacobian.nrows();
    let n_params = jacobian.ncols();
    if errors.len() != n_obs {
        return Err(FitError::DimensionMismatch(format!(
            "Jacobian has {} rows but {} errors were given",
            n_obs,
            errors.len()
        )));
    }
    if n_params == 0 {
        return Err(FitError::InvalidInput(
            "Jacobian has no parameter columns".to_string(),
        ));
    }

    // With values == back_calc the residual vector b comes out zero and is
    // discarded; lambda = 0 leaves the diagonal undamped.
    let zeros = Array1::zeros(n_obs);
    let (a, _) = normal_equations::assemble(n_params, &zeros, &zeros, errors, jacobian, 0.0)?;

    let mut covar = Array2::zeros((n_params, n_params));
    for j in 0..n_params {
        let mut unit = Array1::zeros(n_params);
        unit[j] = 1.0;
        let col = gauss_jordan::solve(&a, &unit)?;
        for i in 0..n_params {
            covar[[i, j]] = col[i];
        }
    }

    Ok(covar)
}

/// Standard errors of the fitted parameters: square roots of the diagonal
/// of the covariance matrix. Non-positive diagonal entries give zero.
pub fn standard_errors(covar: &Array2<f64>) -> Array1<f64> {
    let n = covar.nrows();
    let mut errors = Array1::zeros(n);
    for i in 0..n {
        errors[i] = if covar[[i, i]] > 0.0 {
            covar[[i, i]].sqrt()
        } else {
            0.0
        };
    }
    errors
}

/// Correlation matrix derived from the covariance matrix:
/// `correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])`.
pub fn correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    let mut correl = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            if i == j {
                correl[[i, j]] = 1.0;
            } else {
                let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
                correl[[i, j]] = if denom > 0.0 {
                    covar[[i, j]] / denom
                } else {
                    0.0
                };
            }
        }
    }
    correl
}
