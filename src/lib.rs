//! # relaxfit
//!
//! `relaxfit` fits biophysical relaxation models to experimental NMR data
//! by nonlinear least-squares minimisation of the chi-squared statistic,
//! using the Levenberg-Marquardt algorithm with the damped normal
//! equations solved by Gauss-Jordan elimination.
//!
//! The library provides:
//! - A Levenberg-Marquardt driver with accept/reject damping control and
//!   configurable termination rules
//! - A [`Model`] trait for relaxation models supplying back-calculated
//!   observables and analytic derivatives
//! - Parallel batch fitting of independent spin systems
//! - Covariance and Monte Carlo parameter-error estimation
//!
//! ## Basic Usage
//!
//! ```
//! use ndarray::{array, Array1};
//! use relaxfit::{LevenbergMarquardt, Model, Observations, Result};
//!
//! /// Two-parameter exponential: I(t) = I0 * exp(-R * t).
//! struct ExponentialDecay;
//!
//! impl Model for ExponentialDecay {
//!     type Tag = f64; // relaxation delay in seconds
//!
//!     fn value(&self, delay: &f64, params: &Array1<f64>) -> Result<f64> {
//!         Ok(params[0] * (-params[1] * delay).exp())
//!     }
//!
//!     fn gradient(&self, delay: &f64, params: &Array1<f64>) -> Result<Array1<f64>> {
//!         let decay = (-params[1] * delay).exp();
//!         Ok(array![decay, -params[0] * delay * decay])
//!     }
//!
//!     fn parameter_count(&self) -> usize {
//!         2
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! // Peak heights decaying with I0 = 100 and R = 2 s^-1.
//! let delays: Vec<f64> = vec![0.0, 0.1, 0.2, 0.4, 0.8];
//! let heights = Array1::from_iter(delays.iter().map(|t| 100.0 * (-2.0 * t).exp()));
//! let errors = Array1::from_elem(delays.len(), 1.0);
//! let data = Observations::new(heights, delays, errors)?;
//!
//! let lm = LevenbergMarquardt::new();
//! let fit = lm.minimize(&ExponentialDecay, &data, array![90.0, 1.5])?;
//!
//! assert!((fit.params[1] - 2.0).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod batch;
pub mod chi2;
pub mod error;
pub mod lm;
pub mod model;
pub mod observations;
pub mod uncertainty;

// Re-exports for convenience
pub use error::{FitError, Result};

pub use batch::{fit_batch, FitJob, FitOutcome};
pub use lm::{ConvergenceCriteria, FitConfig, FitResult, LevenbergMarquardt, Termination};
pub use model::Model;
pub use observations::Observations;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
