//! The Levenberg-Marquardt driver loop.
//!
//! Each outer iteration evaluates the model derivative once at the current
//! parameters, assembles and solves the damped normal equations, evaluates
//! the model at the trial parameters, and accepts or rejects the step. The
//! damping factor moves by a fixed factor in the direction dictated by the
//! outcome, with a freeze floor at the bottom of its range.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};
use crate::model::Model;
use crate::observations::Observations;

use super::config::FitConfig;
use super::convergence::{ConvergenceCriteria, FitStatus, Termination};
use super::gauss_jordan;
use super::normal_equations;

/// Outcome of a completed fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    /// Fitted parameter values.
    pub params: Array1<f64>,

    /// Chi-squared at the fitted parameters.
    pub chi2: f64,

    /// Back-calculated observables at the fitted parameters.
    pub back_calc: Array1<f64>,

    /// Number of outer iterations performed.
    pub iterations: usize,

    /// Number of model function and derivative evaluations.
    pub func_evals: usize,

    /// Which stopping rule ended the fit.
    pub termination: Termination,
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fit result:")?;
        writeln!(f, "  Chi-squared: {:.6e}", self.chi2)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Function evaluations: {}", self.func_evals)?;
        writeln!(f, "  Termination: {:?}", self.termination)?;
        writeln!(f, "  Parameters: {:?}", self.params)?;
        Ok(())
    }
}

/// The Levenberg-Marquardt optimizer.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    /// Configuration options
    config: FitConfig,

    /// Cooperative cancellation flag, read once per outer iteration.
    cancel: Option<Arc<AtomicBool>>,
}

impl LevenbergMarquardt {
    /// Create a new optimizer with default configuration.
    pub fn new() -> Self {
        Self {
            config: FitConfig::default(),
            cancel: None,
        }
    }

    /// Create a new optimizer with the given configuration.
    pub fn with_config(config: FitConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Set the initial value of the damping factor.
    pub fn with_initial_lambda(mut self, lambda: f64) -> Self {
        self.config.initial_lambda = lambda;
        self
    }

    /// Set the factor by which the damping factor moves each iteration.
    pub fn with_lambda_factor(mut self, factor: f64) -> Self {
        self.config.lambda_factor = factor;
        self
    }

    /// Set the freeze floor for the damping factor.
    pub fn with_lambda_floor(mut self, floor: f64) -> Self {
        self.config.lambda_floor = floor;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.convergence.max_iterations = max_iterations;
        self
    }

    /// Set the absolute and relative tolerances on the chi-squared
    /// decrease of an accepted step.
    pub fn with_chi2_tolerances(mut self, atol: f64, rtol: f64) -> Self {
        self.config.convergence.chi2_atol = atol;
        self.config.convergence.chi2_rtol = rtol;
        self
    }

    /// Stop only on a bitwise-identical chi-squared repeat, keeping the
    /// iteration ceiling as the sole other way out of the loop.
    pub fn with_exact_convergence(mut self) -> Self {
        let max_iterations = self.config.convergence.max_iterations;
        self.config.convergence = ConvergenceCriteria {
            max_iterations,
            ..ConvergenceCriteria::exact()
        };
        self
    }

    /// Replace the chi-squared statistic.
    pub fn with_chi2_fn(mut self, chi2_fn: crate::chi2::ChiSquared) -> Self {
        self.config.chi2_fn = chi2_fn;
        self
    }

    /// Install a cooperative cancellation flag. Setting the flag makes the
    /// fit fail with [`FitError::Cancelled`] at the top of the next
    /// iteration.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Minimise the chi-squared statistic for the given model and data.
    ///
    /// # Arguments
    ///
    /// * `model` - The relaxation model supplying observables and derivatives
    /// * `data` - The observation set to fit against
    /// * `initial_params` - Starting parameter values
    ///
    /// # Returns
    ///
    /// * `Result<FitResult>` - The fitted parameters and final chi-squared
    pub fn minimize<M: Model>(
        &self,
        model: &M,
        data: &Observations<M::Tag>,
        initial_params: Array1<f64>,
    ) -> Result<FitResult> {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(FitError::InvalidInput(
                "at least one parameter is required".to_string(),
            ));
        }
        if model.parameter_count() != n_params {
            return Err(FitError::DimensionMismatch(format!(
                "model expects {} parameters, got {}",
                model.parameter_count(),
                n_params
            )));
        }
        if data.is_empty() {
            return Err(FitError::InvalidInput(
                "cannot fit an empty observation set".to_string(),
            ));
        }

        let chi2_fn = self.config.chi2_fn;
        let criteria = &self.config.convergence;

        let mut params = initial_params;
        let mut lambda = self.config.initial_lambda;

        let mut back_calc = back_calculate(model, data, &params)?;
        let mut func_evals = data.len();

        let mut chi2 = chi2_fn(data.values(), &back_calc, data.errors());
        if !chi2.is_finite() {
            return Err(FitError::NonFinite(format!(
                "initial chi-squared is {}",
                chi2
            )));
        }

        debug!(
            "starting fit: {} parameters, {} observations, chi2 = {:.6e}",
            n_params,
            data.len(),
            chi2
        );

        let mut iterations = 0;
        loop {
            if iterations >= criteria.max_iterations {
                return Err(FitError::NonConvergence(iterations));
            }
            if let Some(flag) = &self.cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(FitError::Cancelled);
                }
            }

            // Derivatives are taken at the current parameters, never the
            // trial ones.
            let jacobian = build_jacobian(model, data, &params)?;
            func_evals += data.len();

            let (a, b) = normal_equations::assemble(
                n_params,
                data.values(),
                &back_calc,
                data.errors(),
                &jacobian,
                lambda,
            )?;
            ensure_finite(&a, &b)?;

            let delta = gauss_jordan::solve(&a, &b)?;
            if delta.iter().any(|v| !v.is_finite()) {
                return Err(FitError::NonFinite(
                    "step vector contains a non-finite value".to_string(),
                ));
            }
            if delta.len() != params.len() {
                return Err(FitError::DimensionMismatch(format!(
                    "step length {} does not match parameter count {}",
                    delta.len(),
                    params.len()
                )));
            }

            let trial_params = &params + &delta;
            let trial_back_calc = back_calculate(model, data, &trial_params)?;
            func_evals += data.len();
            let trial_chi2 = chi2_fn(data.values(), &trial_back_calc, data.errors());

            trace!(
                "iteration {}: chi2 = {:.6e}, trial chi2 = {:.6e}, lambda = {:.3e}",
                iterations,
                chi2,
                trial_chi2,
                lambda
            );

            iterations += 1;

            if !trial_chi2.is_finite() || trial_chi2 >= chi2 {
                // Rejected: keep the current parameters, take smaller steps.
                lambda = self.inflate(lambda);
            } else {
                // Accepted: move to the trial point, trust the quadratic
                // model a little more.
                let previous = chi2;
                params = trial_params;
                back_calc = trial_back_calc;
                chi2 = trial_chi2;
                lambda = self.deflate(lambda);

                if let FitStatus::Converged(termination) = criteria.check(previous, chi2) {
                    debug!(
                        "converged after {} iterations: chi2 = {:.6e} ({:?})",
                        iterations, chi2, termination
                    );
                    return Ok(FitResult {
                        params,
                        chi2,
                        back_calc,
                        iterations,
                        func_evals,
                        termination,
                    });
                }
            }
        }
    }

    /// Raise lambda by the configured factor, unless it is frozen below
    /// the floor or the product leaves the representable range.
    fn inflate(&self, lambda: f64) -> f64 {
        if lambda < self.config.lambda_floor {
            return lambda;
        }
        let next = lambda * self.config.lambda_factor;
        if next.is_finite() {
            next
        } else {
            lambda
        }
    }

    /// Lower lambda by the configured factor, unless it is frozen below
    /// the floor or the quotient underflows to zero.
    fn deflate(&self, lambda: f64) -> f64 {
        if lambda < self.config.lambda_floor {
            return lambda;
        }
        let next = lambda / self.config.lambda_factor;
        if next > 0.0 {
            next
        } else {
            lambda
        }
    }
}

/// Back-calculate every observable at the given parameters.
fn back_calculate<M: Model>(
    model: &M,
    data: &Observations<M::Tag>,
    params: &Array1<f64>,
) -> Result<Array1<f64>> {
    let mut out = Array1::zeros(data.len());
    for (i, tag) in data.tags().iter().enumerate() {
        out[i] = model.value(tag, params)?;
    }
    Ok(out)
}

/// Build the Jacobian row by row from the model's analytic derivatives.
fn build_jacobian<M: Model>(
    model: &M,
    data: &Observations<M::Tag>,
    params: &Array1<f64>,
) -> Result<Array2<f64>> {
    let n_params = params.len();
    let mut jac = Array2::zeros((data.len(), n_params));
    for (i, tag) in data.tags().iter().enumerate() {
        let row = model.gradient(tag, params)?;
        if row.len() != n_params {
            return Err(FitError::DimensionMismatch(format!(
                "model gradient has length {}, expected {}",
                row.len(),
                n_params
            )));
        }
        for j in 0..n_params {
            jac[[i, j]] = row[j];
        }
    }
    Ok(jac)
}

fn ensure_finite(a: &Array2<f64>, b: &Array1<f64>) -> Result<()> {
    if a.iter().any(|v| !v.is_finite()) || b.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite(
            "normal equations contain a non-finite value".to_string(),
        ));
    }
    Ok(())
}
