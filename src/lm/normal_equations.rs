//! Assembly of the damped normal equations.
//!
//! Builds the approximate-Hessian matrix `A` and gradient vector `b` that
//! each Levenberg-Marquardt iteration hands to the linear solver:
//!
//! ```text
//!        ___
//!        \    /     1      df   df           \
//! A   =   >   | -------- . -- . -- . delta_a |     delta_a = 1 + lambda  (j == k)
//!  jk    /__  \ sigma^2    dp   dp           /     delta_a = 1           (j != k)
//!         i        i         j    k
//!
//!        ___
//!        \    yi - y(xi)   df
//! b   =   >   ---------- . --
//!  j     /__   sigma^2     dp
//!         i        i         j
//! ```
//!
//! Large lambda weights the diagonal and pushes the step toward gradient
//! descent; small lambda approaches the Gauss-Newton step. Both structures
//! are rebuilt from scratch on every call.

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};

/// Build the damped `A` matrix and gradient vector `b` for one iteration.
///
/// `jacobian` holds one row per observation, one column per parameter,
/// evaluated at the current (not trial) parameters.
///
/// # Errors
///
/// [`FitError::DimensionMismatch`] if the sequences are not co-indexed or
/// the Jacobian is not `n_obs` x `n_params`.
pub fn assemble(
    n_params: usize,
    values: &Array1<f64>,
    back_calc: &Array1<f64>,
    errors: &Array1<f64>,
    jacobian: &Array2<f64>,
    lambda: f64,
) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_obs = values.len();
    if back_calc.len() != n_obs || errors.len() != n_obs {
        return Err(FitError::DimensionMismatch(format!(
            "got {} values, {} back-calculated values, and {} errors",
            n_obs,
            back_calc.len(),
            errors.len()
        )));
    }
    if jacobian.nrows() != n_obs || jacobian.ncols() != n_params {
        return Err(FitError::DimensionMismatch(format!(
            "Jacobian is {}x{}, expected {}x{}",
            jacobian.nrows(),
            jacobian.ncols(),
            n_obs,
            n_params
        )));
    }

    let mut a = Array2::zeros((n_params, n_params));
    let mut b = Array1::zeros(n_params);

    for i in 0..n_obs {
        let variance = errors[i] * errors[i];
        let weight = 1.0 / variance;
        let residual = (values[i] - back_calc[i]) * weight;

        // Only the lower triangle plus diagonal is computed; the mirror
        // entry is filled in the same pass.
        for j in 0..n_params {
            b[j] += residual * jacobian[[i, j]];

            for k in 0..=j {
                let mut a_jk = weight * jacobian[[i, j]] * jacobian[[i, k]];
                if j == k {
                    a_jk *= 1.0 + lambda;
                    a[[j, j]] += a_jk;
                } else {
                    a[[j, k]] += a_jk;
                    a[[k, j]] += a_jk;
                }
            }
        }
    }

    Ok((a, b))
}
