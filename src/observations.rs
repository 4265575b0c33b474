//! Experimental observation sets.
//!
//! An [`Observations`] value bundles the three parallel sequences a fit
//! runs against: observed values, per-observation tags, and measurement
//! errors. Construction validates the invariants once, so the driver can
//! borrow the set for the duration of a fit without re-checking.

use ndarray::Array1;

use crate::error::{FitError, Result};

/// An immutable set of experimental observations.
///
/// The three sequences are co-indexed: observation `i` has value
/// `values[i]`, label `tags[i]`, and standard deviation `errors[i]`.
#[derive(Debug, Clone)]
pub struct Observations<T> {
    values: Array1<f64>,
    tags: Vec<T>,
    errors: Array1<f64>,
}

impl<T> Observations<T> {
    /// Create a validated observation set.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::DimensionMismatch`] if the three sequences
    /// differ in length, and [`FitError::InvalidInput`] if any observed
    /// value is non-finite or any error is not strictly positive.
    pub fn new(values: Array1<f64>, tags: Vec<T>, errors: Array1<f64>) -> Result<Self> {
        if values.len() != tags.len() || values.len() != errors.len() {
            return Err(FitError::DimensionMismatch(format!(
                "got {} values, {} tags, and {} errors",
                values.len(),
                tags.len(),
                errors.len()
            )));
        }

        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(FitError::InvalidInput(format!(
                "observed value {} is not finite",
                v
            )));
        }

        // NaN also fails the > 0 comparison.
        if errors.iter().any(|e| !(*e > 0.0) || !e.is_finite()) {
            return Err(FitError::InvalidInput(
                "measurement errors must be strictly positive and finite".to_string(),
            ));
        }

        Ok(Self {
            values,
            tags,
            errors,
        })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the set holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observed values.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Per-observation tags.
    pub fn tags(&self) -> &[T] {
        &self.tags
    }

    /// Measurement errors (standard deviations).
    pub fn errors(&self) -> &Array1<f64> {
        &self.errors
    }
}
