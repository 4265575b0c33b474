//! Batch fitting of independent spin systems.
//!
//! Every fit in a batch owns its own parameters, damping factor, and
//! working structures, so the jobs parallelise without locking as long as
//! the model collaborators are pure. A failing fit is reported in place and
//! never aborts its siblings.

use log::warn;
use ndarray::Array1;
use rayon::prelude::*;

use crate::error::Result;
use crate::lm::{FitResult, LevenbergMarquardt};
use crate::model::Model;
use crate::observations::Observations;

/// One independent fit within a batch.
pub struct FitJob<'a, M: Model> {
    /// Identifier reported with failures, e.g. a residue number.
    pub label: String,

    /// The model to fit.
    pub model: &'a M,

    /// The observation set for this job.
    pub data: &'a Observations<M::Tag>,

    /// Starting parameter values.
    pub initial_params: Array1<f64>,
}

/// Outcome of one job within a batch.
#[derive(Debug)]
pub struct FitOutcome {
    /// The job's label.
    pub label: String,

    /// The fit result, or the error that failed this job alone.
    pub result: Result<FitResult>,
}

/// Run every job to completion in parallel.
///
/// Outcomes are returned in job order. Failures are logged with the job
/// label and carried in the outcome rather than propagated.
pub fn fit_batch<M>(optimizer: &LevenbergMarquardt, jobs: Vec<FitJob<'_, M>>) -> Vec<FitOutcome>
where
    M: Model + Sync,
    M::Tag: Sync,
{
    jobs.into_par_iter()
        .map(|job| {
            let result = optimizer.minimize(job.model, job.data, job.initial_params);
            if let Err(err) = &result {
                warn!("fit '{}' failed: {}", job.label, err);
            }
            FitOutcome {
                label: job.label,
                result,
            }
        })
        .collect()
}
