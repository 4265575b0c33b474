//! Parameter-error estimation on top of a finished fit.

pub mod covariance;
pub mod monte_carlo;

pub use covariance::{correlation, covariance, standard_errors};
pub use monte_carlo::{monte_carlo_errors, MonteCarloResult};
