//! Shared contract of the cover solvers.
//!
//! Every solver maps `(graph, cutoff)` to a [`Solution`]: a feasible cover of
//! the input graph plus the [`Trace`] of improvements found on the way.
//! Randomized solvers carry their seed in the solver value so that all of
//! them fit behind [`CoverSolver`].

use crate::cs::approx::GreedyIndependentCover;
use crate::cs::combinatorial::BranchAndBound;
use crate::cs::graph::Graph;
use crate::cs::optimization::{AnnealingConfig, PrioritySwap, RandomWalk, SimulatedAnnealing};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};


/// One improvement: seconds since the solver started and the quality reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceEntry {
    pub elapsed: f64,
    pub quality: usize,
}

/// Append-only record of improvements, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed: f64, quality: usize) {
        self.entries.push(TraceEntry { elapsed, quality });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }

    /// Qualities only, dropping the wall-clock component.
    pub fn qualities(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.quality).collect()
    }

    /// True when qualities never increase and timestamps never decrease.
    pub fn is_monotone(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[1].quality <= w[0].quality && w[1].elapsed >= w[0].elapsed)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search space was exhausted; the cover is a minimum cover.
    Optimal,
    /// The run finished on its own terms without an optimality proof.
    Completed,
    /// The cutoff stopped the run; the cover is the incumbent at that moment.
    CutoffReached,
}

/// A feasible cover (labels, ascending) and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub cover: Vec<usize>,
    pub trace: Trace,
    pub status: SolveStatus,
}

impl Solution {
    pub fn quality(&self) -> usize {
        self.cover.len()
    }
}

/// Wall-clock budget shared by the solvers.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
    cutoff: Duration,
}

impl Clock {
    pub fn start(cutoff: Duration) -> Self {
        Self {
            start: Instant::now(),
            cutoff,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// True once strictly more than the cutoff has passed.
    pub fn expired(&self) -> bool {
        self.elapsed() > self.cutoff
    }
}

/// A vertex cover solver with a fixed configuration.
pub trait CoverSolver {
    /// Short name used in output file names.
    fn name(&self) -> &'static str;

    /// Solves on a private copy of `graph`; the input is never mutated.
    fn solve(&self, graph: &Graph, cutoff: Duration) -> Solution;
}

/// The solvers selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Approx,
    BranchAndBound,
    SimulatedAnnealing,
    PrioritySwap,
    RandomWalk,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Approx,
        Algorithm::BranchAndBound,
        Algorithm::SimulatedAnnealing,
        Algorithm::PrioritySwap,
        Algorithm::RandomWalk,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Approx => "Approx",
            Algorithm::BranchAndBound => "BnB",
            Algorithm::SimulatedAnnealing => "LS1",
            Algorithm::PrioritySwap => "LS2",
            Algorithm::RandomWalk => "RW",
        }
    }

    /// Whether the seed influences the result.
    pub fn is_randomized(self) -> bool {
        matches!(
            self,
            Algorithm::SimulatedAnnealing | Algorithm::PrioritySwap | Algorithm::RandomWalk
        )
    }

    /// Builds the solver with default settings and the given seed.
    pub fn solver(self, seed: u64) -> Box<dyn CoverSolver + Send + Sync> {
        self.solver_with(seed, &AnnealingConfig::default())
    }

    /// Builds the solver for `seed`; `annealing` only affects LS1.
    pub fn solver_with(
        self,
        seed: u64,
        annealing: &AnnealingConfig,
    ) -> Box<dyn CoverSolver + Send + Sync> {
        match self {
            Algorithm::Approx => Box::new(GreedyIndependentCover),
            Algorithm::BranchAndBound => Box::new(BranchAndBound),
            Algorithm::SimulatedAnnealing => {
                Box::new(SimulatedAnnealing::with_config(seed, annealing.clone()))
            }
            Algorithm::PrioritySwap => Box::new(PrioritySwap::new(seed)),
            Algorithm::RandomWalk => Box::new(RandomWalk::new(seed)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}
