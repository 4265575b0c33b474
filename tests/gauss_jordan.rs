//! Property tests for the Gauss-Jordan linear solver.

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use relaxfit::lm::gauss_jordan::solve;
use relaxfit::FitError;

/// Build a random well-conditioned symmetric positive-definite matrix:
/// M^T M plus a ridge on the diagonal.
fn random_spd(n: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            m[[i, j]] = rng.gen_range(-1.0..1.0);
        }
    }
    let mut a = m.t().dot(&m);
    for i in 0..n {
        a[[i, i]] += n as f64;
    }
    a
}

#[test]
fn solve_recovers_rhs_for_random_spd_systems() {
    let mut rng = ChaCha8Rng::seed_from_u64(1291);

    for n in 2..=8 {
        for _ in 0..25 {
            let a = random_spd(n, &mut rng);
            let b = Array1::from_iter((0..n).map(|_| rng.gen_range(-10.0..10.0)));

            let x = solve(&a, &b).unwrap();
            let recovered = a.dot(&x);

            for i in 0..n {
                let scale = b[i].abs().max(1.0);
                assert!(
                    (recovered[i] - b[i]).abs() / scale < 1e-9,
                    "size {}: A.x differs from b at row {}: {} vs {}",
                    n,
                    i,
                    recovered[i],
                    b[i]
                );
            }
        }
    }
}

#[test]
fn solve_is_bitwise_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let a = random_spd(5, &mut rng);
    let b = Array1::from_iter((0..5).map(|_| rng.gen_range(-10.0..10.0)));

    let x1 = solve(&a, &b).unwrap();
    let x2 = solve(&a, &b).unwrap();
    for i in 0..5 {
        assert_eq!(x1[i].to_bits(), x2[i].to_bits());
    }
}

#[test]
fn singular_matrices_are_detected() {
    // A zero row.
    let a = ndarray::array![[1.0, 2.0, 3.0], [0.0, 0.0, 0.0], [4.0, 5.0, 6.0]];
    let b = ndarray::array![1.0, 0.0, 2.0];
    assert!(matches!(solve(&a, &b), Err(FitError::SingularMatrix)));

    // Two identical rows.
    let a = ndarray::array![[1.0, 2.0], [1.0, 2.0]];
    let b = ndarray::array![1.0, 1.0];
    assert!(matches!(solve(&a, &b), Err(FitError::SingularMatrix)));

    // Proportional rows: the second pivot collapses after reduction.
    let a = ndarray::array![[1.0, 2.0], [2.0, 4.0]];
    let b = ndarray::array![1.0, 2.0];
    assert!(matches!(solve(&a, &b), Err(FitError::SingularMatrix)));
}

#[test]
fn mismatched_shapes_are_rejected() {
    let a = Array2::<f64>::eye(3);
    let b = ndarray::array![1.0, 2.0];
    assert!(matches!(solve(&a, &b), Err(FitError::DimensionMismatch(_))));
}
