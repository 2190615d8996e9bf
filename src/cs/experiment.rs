//! # Batch runs and run-time statistics
//!
//! Runs one solver over several seeds and summarizes the outcome. Seeds run
//! in parallel on the rayon pool; each run is still a single-threaded solve
//! on its own copy of the graph, so wall-clock figures include contention
//! when the pool is smaller than the batch.
//!
//! The distributions follow the usual empirical-algorithmics conventions:
//! - **QRTD** (qualified run-time distribution): for a target quality, the
//!   fraction of runs that reached it by each time.
//! - **SQD** (solution quality distribution): at a fixed time, the fraction of
//!   runs whose incumbent lies within a relative error bound of the optimum.

use crate::cs::graph::{CoverChecker, Graph};
use crate::cs::optimization::AnnealingConfig;
use crate::cs::solver::{Algorithm, SolveStatus, Trace};
use log::info;
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};

/// Outcome of one seeded run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub seed: u64,
    pub quality: usize,
    /// Total wall-clock seconds of the run.
    pub elapsed: f64,
    pub trace: Trace,
    pub status: SolveStatus,
    /// Whether the returned cover covers the input graph.
    pub feasible: bool,
}

impl RunRecord {
    /// Seconds until the final incumbent was found.
    pub fn time_to_best(&self) -> f64 {
        self.trace.last().map_or(0.0, |entry| entry.elapsed)
    }
}

/// Runs `algorithm` once per seed and verifies every returned cover.
pub fn run_batch(
    graph: &Graph,
    algorithm: Algorithm,
    seeds: &[u64],
    cutoff: Duration,
) -> Vec<RunRecord> {
    run_batch_with(graph, algorithm, seeds, cutoff, &AnnealingConfig::default())
}

/// [`run_batch`] with explicit annealing settings for LS1 runs.
pub fn run_batch_with(
    graph: &Graph,
    algorithm: Algorithm,
    seeds: &[u64],
    cutoff: Duration,
    annealing: &AnnealingConfig,
) -> Vec<RunRecord> {
    let checker = CoverChecker::new(graph);
    let records: Vec<RunRecord> = seeds
        .par_iter()
        .map(|&seed| {
            let start = Instant::now();
            let solution = algorithm.solver_with(seed, annealing).solve(graph, cutoff);
            RunRecord {
                seed,
                quality: solution.cover.len(),
                elapsed: start.elapsed().as_secs_f64(),
                feasible: checker.is_cover(&solution.cover),
                trace: solution.trace,
                status: solution.status,
            }
        })
        .collect();
    info!("{algorithm}: {} runs finished", records.len());
    records
}

/// Aggregate view of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub runs: usize,
    pub best_quality: usize,
    pub mean_quality: f64,
    pub mean_time_to_best: f64,
    /// Mean of `(quality - optimum) / optimum`, when the optimum is known and positive.
    pub relative_error: Option<f64>,
    pub all_feasible: bool,
}

impl Summary {
    /// Returns `None` for an empty batch.
    pub fn from_records(records: &[RunRecord], optimum: Option<usize>) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let runs = records.len() as f64;
        let best_quality = records.iter().map(|r| r.quality).min()?;
        let mean_quality = records.iter().map(|r| r.quality as f64).sum::<f64>() / runs;
        let mean_time_to_best = records.iter().map(RunRecord::time_to_best).sum::<f64>() / runs;
        let relative_error = optimum.filter(|&opt| opt > 0).map(|opt| {
            records
                .iter()
                .map(|r| relative_error(r.quality, opt))
                .sum::<f64>()
                / runs
        });

        Some(Self {
            runs: records.len(),
            best_quality,
            mean_quality,
            mean_time_to_best,
            relative_error,
            all_feasible: records.iter().all(|r| r.feasible),
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={} best={} mean={:.2} time_to_best={:.3}s",
            self.runs, self.best_quality, self.mean_quality, self.mean_time_to_best
        )?;
        if let Some(error) = self.relative_error {
            write!(f, " rel_err={error:.4}")?;
        }
        if !self.all_feasible {
            write!(f, " (INFEASIBLE RUNS)")?;
        }
        Ok(())
    }
}

fn relative_error(quality: usize, optimum: usize) -> f64 {
    (quality as f64 - optimum as f64) / optimum as f64
}

/// First time at which the trace reached `target` or better.
pub fn time_to_quality(trace: &Trace, target: usize) -> Option<f64> {
    trace
        .iter()
        .find(|entry| entry.quality <= target)
        .map(|entry| entry.elapsed)
}

/// Incumbent quality at `time`, if any improvement was recorded by then.
pub fn quality_at(trace: &Trace, time: f64) -> Option<usize> {
    trace
        .iter()
        .take_while(|entry| entry.elapsed <= time)
        .last()
        .map(|entry| entry.quality)
}

/// QRTD: for each time, the fraction of runs that reached `target` by then.
pub fn qualified_runtime(records: &[RunRecord], target: usize, times: &[f64]) -> Vec<f64> {
    let reached: Vec<Option<f64>> = records
        .iter()
        .map(|r| time_to_quality(&r.trace, target))
        .collect();
    times
        .iter()
        .map(|&t| fraction(&reached, |hit| hit.is_some_and(|at| at <= t)))
        .collect()
}

/// SQD: for each relative error bound, the fraction of runs whose incumbent
/// at `time` was within that bound of `optimum`.
pub fn solution_quality(
    records: &[RunRecord],
    optimum: usize,
    time: f64,
    bounds: &[f64],
) -> Vec<f64> {
    let qualities: Vec<Option<usize>> = records.iter().map(|r| quality_at(&r.trace, time)).collect();
    bounds
        .iter()
        .map(|&bound| {
            fraction(&qualities, |quality| {
                quality.is_some_and(|q| {
                    if optimum == 0 {
                        q == 0
                    } else {
                        relative_error(q, optimum) <= bound
                    }
                })
            })
        })
        .collect()
}

fn fraction<T: Copy>(values: &[T], predicate: impl Fn(T) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|&&v| predicate(v)).count() as f64 / values.len() as f64
}
