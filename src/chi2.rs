//! The chi-squared statistic.

use ndarray::Array1;

/// Signature of the statistic the driver minimises: observed values,
/// back-calculated values, measurement errors.
pub type ChiSquared = fn(&Array1<f64>, &Array1<f64>, &Array1<f64>) -> f64;

/// Weighted sum-of-squares error between observed and back-calculated
/// values:
///
/// ```text
///        _n_
///        \   / yi - y(xi) \ 2
/// chi2 =  >  | ---------- |
///        /__ \   sigma_i  /
///        i=1
/// ```
pub fn chi2(values: &Array1<f64>, back_calc: &Array1<f64>, errors: &Array1<f64>) -> f64 {
    values
        .iter()
        .zip(back_calc.iter())
        .zip(errors.iter())
        .map(|((y, yc), e)| ((y - yc) / e).powi(2))
        .sum()
}

/// Chi-squared per degree of freedom.
///
/// Returns NaN when there are no degrees of freedom left.
pub fn reduced_chi2(chi2: f64, n_obs: usize, n_params: usize) -> f64 {
    if n_obs <= n_params {
        return f64::NAN;
    }
    chi2 / (n_obs - n_params) as f64
}
