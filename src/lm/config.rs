//! Configuration options for the Levenberg-Marquardt driver.

use crate::chi2::{self, ChiSquared};

use super::convergence::ConvergenceCriteria;

/// Floor below which the damping factor is frozen: once lambda drops under
/// this value it is never updated again for the rest of the fit, in either
/// direction.
pub const LAMBDA_FLOOR: f64 = 1e-99;

/// Configuration options for the Levenberg-Marquardt driver.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Initial value of the damping factor. Default: 1.0
    pub initial_lambda: f64,

    /// Factor by which lambda is multiplied on a rejected step and divided
    /// on an accepted one. Default: 10.0
    pub lambda_factor: f64,

    /// Freeze floor for lambda. Default: [`LAMBDA_FLOOR`]
    pub lambda_floor: f64,

    /// Stopping rules.
    pub convergence: ConvergenceCriteria,

    /// The statistic to minimise. Default: [`chi2::chi2`]
    pub chi2_fn: ChiSquared,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            initial_lambda: 1.0,
            lambda_factor: 10.0,
            lambda_floor: LAMBDA_FLOOR,
            convergence: ConvergenceCriteria::default(),
            chi2_fn: chi2::chi2,
        }
    }
}
