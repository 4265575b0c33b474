//! Gauss-Jordan elimination.
//!
//! Direct solution of the normal equations `A·x = b` by full reduction of
//! the augmented matrix `[A|b]`: at every pivot step all other rows are
//! reduced, leaving the identity in the A-block and the solution in the
//! last column. O(P^3) per call, which is fine for the small parameter
//! counts (P <= 10 or so) this crate fits.

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};

/// Solve `A·x = b`.
///
/// # Errors
///
/// * [`FitError::DimensionMismatch`] if `A` is not square or `b` does not
///   match its row count.
/// * [`FitError::SingularMatrix`] if a pivot column has no nonzero entry
///   left to swap in.
pub fn solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(FitError::DimensionMismatch(format!(
            "cannot solve a {}x{} system against a length-{} vector",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }

    // Construct the augmented matrix [A|b].
    let mut aug = Array2::zeros((n, n + 1));
    for row in 0..n {
        for col in 0..n {
            aug[[row, col]] = a[[row, col]];
        }
        aug[[row, n]] = b[row];
    }

    // Row reduce [A|b].
    for i in 0..n {
        reduce_row(&mut aug, i)?;
    }

    // The solution is the last column of the reduced matrix.
    Ok(aug.column(n).to_owned())
}

/// Reduce one pivot row, zeroing column `i` in every other row.
fn reduce_row(aug: &mut Array2<f64>, i: usize) -> Result<()> {
    let n = aug.nrows();
    let cols = aug.ncols();

    // A pivot of exactly zero cannot be divided through; look below for a
    // row to swap in.
    if aug[[i, i]] == 0.0 {
        let swap = (i..n)
            .find(|&row| aug[[row, i]] != 0.0)
            .ok_or(FitError::SingularMatrix)?;
        for col in 0..cols {
            aug.swap([i, col], [swap, col]);
        }
    }

    // Normalise the row so that aug[i][i] == 1.
    let pivot = aug[[i, i]];
    for col in 0..cols {
        aug[[i, col]] /= pivot;
    }

    // Subtract multiples of row i from every other row.
    for row in 0..n {
        if row == i {
            continue;
        }
        let factor = aug[[row, i]];
        for col in 0..cols {
            aug[[row, col]] -= factor * aug[[i, col]];
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_identity() {
        let a = array![[1.0, 0.0], [0.0, 1.0]];
        let b = array![3.0, -2.0];
        let x = solve(&a, &b).unwrap();
        assert_relative_eq!(x[0], 3.0);
        assert_relative_eq!(x[1], -2.0);
    }

    #[test]
    fn test_known_3x3() {
        let a = array![[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]];
        let b = array![8.0, -11.0, -3.0];
        let x = solve(&a, &b).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_pivot_with_swap() {
        let a = array![[0.0, 1.0], [1.0, 0.0]];
        let b = array![5.0, 7.0];
        let x = solve(&a, &b).unwrap();
        assert_relative_eq!(x[0], 7.0);
        assert_relative_eq!(x[1], 5.0);
    }

    #[test]
    fn test_singular_rank_deficient() {
        // Second row is twice the first; column 1 collapses after the
        // first reduction.
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![1.0, 2.0];
        assert!(matches!(solve(&a, &b), Err(FitError::SingularMatrix)));
    }

    #[test]
    fn test_singular_zero_row() {
        let a = array![[1.0, 2.0], [0.0, 0.0]];
        let b = array![1.0, 0.0];
        assert!(matches!(solve(&a, &b), Err(FitError::SingularMatrix)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let b = array![1.0, 2.0];
        assert!(matches!(solve(&a, &b), Err(FitError::DimensionMismatch(_))));

        let a = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let b = array![1.0, 2.0];
        assert!(matches!(solve(&a, &b), Err(FitError::DimensionMismatch(_))));
    }

    #[test]
    fn test_deterministic() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let b = array![1.0, 2.0];
        let x1 = solve(&a, &b).unwrap();
        let x2 = solve(&a, &b).unwrap();
        // Bitwise identical, not merely close.
        assert_eq!(x1[0].to_bits(), x2[0].to_bits());
        assert_eq!(x1[1].to_bits(), x2[1].to_bits());
    }
}
