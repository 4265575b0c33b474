//! Termination policy for the minimisation loop.
//!
//! An accepted step is classified against two stopping rules: the historic
//! bitwise-equality rule (two successive accepted chi-squared values are
//! identical) and a configurable absolute/relative tolerance on the
//! chi-squared decrease. Zeroing both tolerances reduces the check to the
//! equality rule alone, since |dchi2| == 0.0 is exactly |dchi2| <= 0.

use serde::{Deserialize, Serialize};

/// Reason an accepted step ended the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Two successive accepted chi-squared values were bitwise identical.
    ExactMatch,

    /// The chi-squared decrease fell within the configured tolerances.
    ToleranceReached,
}

/// State of a fit after classifying an accepted step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitStatus {
    /// Keep iterating.
    Running,

    /// The stopping rule fired.
    Converged(Termination),
}

impl FitStatus {
    /// True if the fit should stop.
    pub fn is_converged(&self) -> bool {
        matches!(self, FitStatus::Converged(_))
    }
}

/// Stopping rules for the Levenberg-Marquardt loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceCriteria {
    /// Absolute tolerance on the chi-squared decrease of an accepted step.
    /// Default: 1e-12
    pub chi2_atol: f64,

    /// Relative tolerance on the chi-squared decrease of an accepted step.
    /// Default: 1e-12
    pub chi2_rtol: f64,

    /// Iteration ceiling; exceeding it fails the fit rather than hanging.
    /// Default: 10_000_000
    pub max_iterations: usize,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            chi2_atol: 1e-12,
            chi2_rtol: 1e-12,
            max_iterations: 10_000_000,
        }
    }
}

impl ConvergenceCriteria {
    /// Parity mode: stop only when an accepted step leaves chi-squared
    /// bitwise unchanged. The iteration ceiling still applies.
    pub fn exact() -> Self {
        Self {
            chi2_atol: 0.0,
            chi2_rtol: 0.0,
            ..Self::default()
        }
    }

    /// Classify an accepted step from the previous to the new chi-squared.
    pub fn check(&self, chi2_old: f64, chi2_new: f64) -> FitStatus {
        let diff = (chi2_old - chi2_new).abs();
        if diff == 0.0 {
            return FitStatus::Converged(Termination::ExactMatch);
        }
        if diff <= self.chi2_atol + self.chi2_rtol * chi2_old.abs() {
            return FitStatus::Converged(Termination::ToleranceReached);
        }
        FitStatus::Running
    }
}
