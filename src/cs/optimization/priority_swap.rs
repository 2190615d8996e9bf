//! # Degree-ordered cover shrinking
//!
//! Starts from the trivial cover (every node) and tries to drop nodes in
//! increasing order of degree. A drop is kept only if every edge of the input
//! graph still has a covered endpoint; otherwise the node is put back.
//!
//! Priorities are the degrees of the input graph, computed once when the
//! queue is built. They are not refreshed as nodes leave, so the order is only
//! approximately minimum-degree-first. The seed breaks ties between nodes of
//! equal degree.

use crate::cs::graph::Graph;
use crate::cs::solver::{Clock, CoverSolver, Solution, SolveStatus, Trace};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Greedy removal search over a min-degree priority queue.
#[derive(Debug, Clone, Copy)]
pub struct PrioritySwap {
    seed: u64,
}

impl PrioritySwap {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl CoverSolver for PrioritySwap {
    fn name(&self) -> &'static str {
        "LS2"
    }

    fn solve(&self, graph: &Graph, cutoff: Duration) -> Solution {
        solve(graph, self.seed, cutoff)
    }
}

/// Shrinks the trivial cover one node at a time.
///
/// Every kept removal appends `(elapsed, nodes left)` to the trace; the
/// trivial cover itself is the first entry.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use covers::cs::graph::Graph;
/// use covers::cs::optimization::priority_swap;
///
/// let graph = Graph::from_edges(&[(1, 2), (1, 3), (1, 4)]).unwrap();
/// let solution = priority_swap::solve(&graph, 1, Duration::from_secs(1));
/// assert_eq!(solution.cover, vec![1]);
/// assert_eq!(solution.trace.qualities(), vec![4, 3, 2, 1]);
/// ```
pub fn solve(graph: &Graph, seed: u64, cutoff: Duration) -> Solution {
    let clock = Clock::start(cutoff);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut queue: BinaryHeap<Reverse<(usize, u64, usize)>> = graph
        .nodes()
        .map(|v| Reverse((graph.degree(v), rng.gen::<u64>(), v)))
        .collect();

    // Nodes still in the cover; the input graph stays the reference.
    let mut remaining = graph.clone();
    let mut trace = Trace::new();
    trace.record(clock.elapsed_secs(), remaining.node_count());

    let mut status = SolveStatus::Completed;
    while let Some(Reverse((_, _, v))) = queue.pop() {
        if clock.expired() {
            status = SolveStatus::CutoffReached;
            break;
        }
        let removed = remaining.remove_node(v);
        let still_covered = graph.neighbors(v).iter().all(|&u| remaining.contains(u));
        if still_covered {
            trace.record(clock.elapsed_secs(), remaining.node_count());
            debug!(
                "priority search: dropped {} ({} left)",
                graph.label(v),
                remaining.node_count()
            );
        } else {
            remaining.restore_node(removed);
        }
    }

    info!(
        "priority search: cover of {} in {:.3}s",
        remaining.node_count(),
        clock.elapsed_secs()
    );

    Solution {
        cover: remaining.node_labels(),
        trace,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::graph::CoverChecker;

    #[test]
    fn test_single_edge_keeps_one_endpoint() {
        let graph = Graph::from_edges(&[(1, 2)]).unwrap();
        for seed in 0..8 {
            let solution = solve(&graph, seed, Duration::from_secs(1));
            assert!(solution.cover == vec![1] || solution.cover == vec![2]);
            assert_eq!(solution.trace.qualities(), vec![2, 1]);
        }
    }

    #[test]
    fn test_isolated_nodes_are_dropped() {
        let mut graph = Graph::from_edges(&[(1, 2), (2, 3)]).unwrap();
        graph.add_node(4).unwrap();
        graph.add_node(5).unwrap();
        let solution = solve(&graph, 3, Duration::from_secs(1));
        assert_eq!(solution.cover, vec![2]);
        assert_eq!(solution.status, SolveStatus::Completed);
    }

    #[test]
    fn test_result_is_feasible_and_trace_shrinks() {
        let edges: Vec<(usize, usize)> = (1..=30)
            .flat_map(|i| [(i, i % 30 + 1), (i, (i + 7) % 30 + 1)])
            .collect();
        let graph = Graph::from_edges(&edges).unwrap();
        let solution = solve(&graph, 42, Duration::from_secs(5));
        assert!(CoverChecker::new(&graph).is_cover(&solution.cover));
        let qualities = solution.trace.qualities();
        assert!(qualities.windows(2).all(|w| w[1] + 1 == w[0]));
        assert_eq!(*qualities.last().unwrap(), solution.cover.len());
    }

    #[test]
    fn test_zero_cutoff_keeps_trivial_cover() {
        let graph = Graph::from_edges(&[(1, 2), (2, 3), (3, 4)]).unwrap();
        let solution = solve(&graph, 0, Duration::ZERO);
        assert_eq!(solution.cover, vec![1, 2, 3, 4]);
        assert_eq!(solution.status, SolveStatus::CutoffReached);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let graph = Graph::from_edges(&[(1, 2), (2, 3), (3, 1)]).unwrap();
        let _ = solve(&graph, 0, Duration::from_secs(1));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }
}
