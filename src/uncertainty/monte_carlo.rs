//! Monte Carlo parameter errors.
//!
//! The simulation mirrors the standard relaxation-analysis workflow:
//! back-calculate the observables at the best-fit parameters, synthesise
//! replicates by adding Gaussian noise scaled to the measurement errors,
//! refit every replicate from the best-fit starting point, and read the
//! parameter errors off the spread of the replicate fits. Noise is drawn
//! sequentially from a seeded generator so a run is reproducible; only the
//! refits execute in parallel.

use log::warn;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::error::{FitError, Result};
use crate::lm::LevenbergMarquardt;
use crate::model::Model;
use crate::observations::Observations;

/// Result of a Monte Carlo error analysis.
#[derive(Debug, Clone)]
pub struct MonteCarloResult {
    /// Fitted parameter sets from every replicate that converged.
    pub parameter_sets: Vec<Array1<f64>>,

    /// Mean parameter values across the converged replicates.
    pub means: Array1<f64>,

    /// Parameter standard deviations across the converged replicates.
    pub stds: Array1<f64>,

    /// Number of replicates whose fit failed.
    pub failures: usize,
}

/// Estimate parameter errors from `n_replicates` synthetic data sets.
///
/// # Arguments
///
/// * `optimizer` - The optimizer used for every replicate refit
/// * `model` - The fitted model
/// * `data` - The experimental observation set
/// * `best_params` - Best-fit parameters, used both to synthesise data and
///   as the starting point of every refit
/// * `n_replicates` - Number of synthetic replicates (at least 2)
/// * `seed` - Seed for the noise generator
///
/// # Errors
///
/// Fails with [`FitError::ComputationError`] when fewer than two replicate
/// fits converge; individual replicate failures are logged and counted.
pub fn monte_carlo_errors<M>(
    optimizer: &LevenbergMarquardt,
    model: &M,
    data: &Observations<M::Tag>,
    best_params: &Array1<f64>,
    n_replicates: usize,
    seed: u64,
) -> Result<MonteCarloResult>
where
    M: Model + Sync,
    M::Tag: Clone + Send + Sync,
{
    if n_replicates < 2 {
        return Err(FitError::InvalidInput(
            "at least two Monte Carlo replicates are required".to_string(),
        ));
    }

    let mut back_calc = Array1::zeros(data.len());
    for (i, tag) in data.tags().iter().enumerate() {
        back_calc[i] = model.value(tag, best_params)?;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut synthetic = Vec::with_capacity(n_replicates);
    for _ in 0..n_replicates {
        let mut values = Array1::zeros(data.len());
        for i in 0..data.len() {
            let noise = Normal::new(0.0, data.errors()[i])
                .map_err(|e| FitError::InvalidInput(format!("bad noise width: {}", e)))?;
            values[i] = back_calc[i] + noise.sample(&mut rng);
        }
        synthetic.push(values);
    }

    let fits: Vec<Result<Array1<f64>>> = synthetic
        .into_par_iter()
        .map(|values| {
            let replicate = Observations::new(values, data.tags().to_vec(), data.errors().clone())?;
            optimizer
                .minimize(model, &replicate, best_params.clone())
                .map(|fit| fit.params)
        })
        .collect();

    let mut parameter_sets = Vec::new();
    let mut failures = 0;
    for fit in fits {
        match fit {
            Ok(params) => parameter_sets.push(params),
            Err(err) => {
                failures += 1;
                warn!("Monte Carlo replicate failed: {}", err);
            }
        }
    }

    if parameter_sets.len() < 2 {
        return Err(FitError::ComputationError(format!(
            "only {} of {} Monte Carlo replicates converged",
            parameter_sets.len(),
            n_replicates
        )));
    }

    let n_params = best_params.len();
    let n = parameter_sets.len() as f64;
    let mut means = Array1::zeros(n_params);
    let mut stds = Array1::zeros(n_params);
    for j in 0..n_params {
        let mean = parameter_sets.iter().map(|p| p[j]).sum::<f64>() / n;
        let var = parameter_sets
            .iter()
            .map(|p| (p[j] - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        means[j] = mean;
        stds[j] = var.sqrt();
    }

    Ok(MonteCarloResult {
        parameter_sets,
        means,
        stds,
        failures,
    })
}
