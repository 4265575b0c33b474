//! Benchmarks for the minimisation core: the Gauss-Jordan solver on its
//! own and a whole exponential-decay fit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::{array, Array1, Array2};

use relaxfit::lm::gauss_jordan::solve;
use relaxfit::{LevenbergMarquardt, Model, Observations, Result};

/// Two-parameter exponential decay: I(t) = I0 * exp(-R * t).
struct ExponentialDecay;

impl Model for ExponentialDecay {
    type Tag = f64;

    fn value(&self, delay: &f64, params: &Array1<f64>) -> Result<f64> {
        Ok(params[0] * (-params[1] * delay).exp())
    }

    fn gradient(&self, delay: &f64, params: &Array1<f64>) -> Result<Array1<f64>> {
        let decay = (-params[1] * delay).exp();
        Ok(array![decay, -params[0] * delay * decay])
    }

    fn parameter_count(&self) -> usize {
        2
    }
}

fn spd_system(n: usize) -> (Array2<f64>, Array1<f64>) {
    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            m[[i, j]] = ((i * n + j) % 7) as f64 - 3.0;
        }
    }
    let mut a = m.t().dot(&m);
    for i in 0..n {
        a[[i, i]] += n as f64;
    }
    let b = Array1::from_iter((0..n).map(|i| (i as f64) - 1.5));
    (a, b)
}

fn bench_gauss_jordan(c: &mut Criterion) {
    for n in [2, 5, 8] {
        let (a, b) = spd_system(n);
        c.bench_function(&format!("gauss_jordan_{}x{}", n, n), |bencher| {
            bencher.iter(|| solve(black_box(&a), black_box(&b)).unwrap())
        });
    }
}

fn bench_exponential_fit(c: &mut Criterion) {
    let delays: Vec<f64> = (1..=50).map(|i| i as f64 * 0.02).collect();
    let heights = Array1::from_iter(delays.iter().map(|t| 150.0 * (-1.8 * t).exp()));
    let errors = Array1::from_elem(delays.len(), 0.5);
    let data = Observations::new(heights, delays, errors).unwrap();

    let lm = LevenbergMarquardt::new();
    c.bench_function("exponential_fit_50_points", |bencher| {
        bencher.iter(|| {
            lm.minimize(&ExponentialDecay, &data, black_box(array![100.0, 1.0]))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_gauss_jordan, bench_exponential_fit);
criterion_main!(benches);
