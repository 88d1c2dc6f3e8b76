//! Gene-level parallelism on a rayon pool.

use std::sync::mpsc;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::info;

use super::{BacktranslationOrchestrator, GeneJob, GeneReport};
use crate::error::BacktranslationError;

fn build_pool(threads: Option<usize>) -> Result<ThreadPool, BacktranslationError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    builder
        .build()
        .map_err(|e| BacktranslationError::ThreadPool(e.to_string()))
}

/// Run every job and return the reports in completion order. The first
/// failing job's error is returned.
pub fn run_jobs(
    orchestrator: &BacktranslationOrchestrator,
    jobs: &[GeneJob],
) -> Result<Vec<GeneReport>, BacktranslationError> {
    let pool = build_pool(orchestrator.context().config().threads)?;
    info!(jobs = jobs.len(), threads = pool.current_num_threads(), "dispatching genes");
    let (sender, receiver) = mpsc::channel();
    pool.install(|| {
        jobs.par_iter().for_each_with(sender, |sender, job| {
            // The receiver outlives the pool scope, so a send cannot fail.
            let _ = sender.send(orchestrator.backtranslate(job));
        });
    });
    receiver.into_iter().collect()
}

/// Run every job and return the reports in input order.
pub fn run_jobs_ordered(
    orchestrator: &BacktranslationOrchestrator,
    jobs: &[GeneJob],
) -> Result<Vec<GeneReport>, BacktranslationError> {
    let pool = build_pool(orchestrator.context().config().threads)?;
    info!(jobs = jobs.len(), threads = pool.current_num_threads(), "dispatching genes");
    pool.install(|| {
        jobs.par_iter()
            .map(|job| orchestrator.backtranslate(job))
            .collect()
    })
}
