//! Model function interface.
//!
//! A [`Model`] supplies the two opaque callables the minimiser needs: the
//! back-calculation of a single observable and its analytic derivatives.
//! The concrete relaxation equations (R1/R2/NOE back-calculation and their
//! gradients) live behind this trait; the driver never looks inside.

use ndarray::Array1;

use crate::error::Result;

/// A relaxation model to be fitted by the Levenberg-Marquardt driver.
///
/// Implementors hold whatever fixed state the equations need (field
/// strengths, correlation times, interatomic distances); those take the
/// place of the option block threaded through the equivalent procedural
/// interfaces.
pub trait Model {
    /// Per-observation label passed through untouched, e.g. a relaxation
    /// experiment identifier or a delay time.
    type Tag;

    /// Back-calculate a single observable at the given parameters.
    fn value(&self, tag: &Self::Tag, params: &Array1<f64>) -> Result<f64>;

    /// Partial derivatives of the observable with respect to every
    /// parameter, in the same order as `params`.
    fn gradient(&self, tag: &Self::Tag, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Number of parameters the model expects.
    fn parameter_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    /// f(tag) = p0 * tag
    struct ScalingModel;

    impl Model for ScalingModel {
        type Tag = f64;

        fn value(&self, tag: &f64, params: &Array1<f64>) -> Result<f64> {
            Ok(params[0] * tag)
        }

        fn gradient(&self, tag: &f64, _params: &Array1<f64>) -> Result<Array1<f64>> {
            Ok(array![*tag])
        }

        fn parameter_count(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_value_and_gradient() {
        let model = ScalingModel;
        let params = array![2.0];

        assert_relative_eq!(model.value(&3.0, &params).unwrap(), 6.0);

        let grad = model.gradient(&3.0, &params).unwrap();
        assert_eq!(grad.len(), model.parameter_count());
        assert_relative_eq!(grad[0], 3.0);
    }
}
