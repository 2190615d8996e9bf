use crate::cs::graph::Graph;
use crate::cs::solver::{Clock, CoverSolver, Solution, SolveStatus, Trace};
use bitvec::prelude::*;
use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Random constructive baseline: add random nodes until every edge is covered.
#[derive(Debug, Clone, Copy)]
pub struct RandomWalk {
    seed: u64,
}

impl RandomWalk {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl CoverSolver for RandomWalk {
    fn name(&self) -> &'static str {
        "RW"
    }

    fn solve(&self, graph: &Graph, cutoff: Duration) -> Solution {
        solve(graph, self.seed, cutoff)
    }
}

/// Picks nodes uniformly at random, without replacement, until the picked set
/// covers the graph. Records one trace entry at the end.
///
/// If the cutoff passes first the trivial cover is returned.
pub fn solve(graph: &Graph, seed: u64, cutoff: Duration) -> Solution {
    let clock = Clock::start(cutoff);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = graph.nodes().collect();
    order.shuffle(&mut rng);

    let mut picked = bitvec![0; graph.capacity()];
    let mut uncovered = graph.edge_count();
    let mut cover = Vec::new();
    let mut status = SolveStatus::Completed;

    for v in order {
        if uncovered == 0 {
            break;
        }
        if clock.expired() {
            status = SolveStatus::CutoffReached;
            cover = graph.nodes().collect();
            break;
        }
        uncovered -= graph.neighbors(v).iter().filter(|&&u| !picked[u]).count();
        picked.set(v, true);
        cover.push(v);
    }

    let cover = graph.labels_of(cover);
    let mut trace = Trace::new();
    trace.record(clock.elapsed_secs(), cover.len());
    info!(
        "random walk: cover of {} in {:.3}s",
        cover.len(),
        clock.elapsed_secs()
    );

    Solution {
        cover,
        trace,
        status,
    }
}
