//! Exact branch-and-bound search for a minimum vertex cover.
//!
//! The search walks the space of covers depth first on a single working copy
//! of the graph. Each level picks the node of maximum remaining degree `v`
//! and tries two subproblems:
//!
//! 1. `v` joins the cover; `v` and its edges leave the subgraph.
//! 2. `v` stays out, so every neighbor of `v` is forced into the cover; the
//!    neighbors and their edges leave the subgraph as well.
//!
//! The subgraph therefore always holds exactly the edges the partial cover
//! has not covered yet. A subtree is pruned when
//! `|cover| + ceil(remaining_edges / max_degree)` cannot beat the incumbent:
//! each uncovered edge needs another cover node and one node covers at most
//! `max_degree` of them.
//!
//! Every removal is undone from its [`RemovedNode`] record before the level
//! returns, so siblings see the subgraph exactly as their parent left it.
//!
//! Pending levels live on a heap-allocated frame stack, so long dives on
//! large sparse graphs do not depend on the thread's stack size.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use covers::cs::graph::Graph;
//! use covers::cs::combinatorial::branch_and_bound;
//! use covers::cs::solver::SolveStatus;
//!
//! // Star with center 1.
//! let graph = Graph::from_edges(&[(1, 2), (1, 3), (1, 4)]).unwrap();
//! let solution = branch_and_bound::solve(&graph, Duration::from_secs(1));
//! assert_eq!(solution.cover, vec![1]);
//! assert_eq!(solution.status, SolveStatus::Optimal);
//! ```

use crate::cs::graph::{Graph, RemovedNode};
use crate::cs::solver::{Clock, CoverSolver, Solution, SolveStatus, Trace};
use log::{debug, info, warn};
use std::time::Duration;

/// Exact solver; only the cutoff limits it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound;

impl CoverSolver for BranchAndBound {
    fn name(&self) -> &'static str {
        "BnB"
    }

    fn solve(&self, graph: &Graph, cutoff: Duration) -> Solution {
        solve(graph, cutoff)
    }
}

/// Searches for a minimum vertex cover until the space is exhausted or the
/// cutoff passes.
///
/// # Returns
///
/// The incumbent at the end of the search. Its status is
/// [`SolveStatus::Optimal`] only if the search finished before the cutoff;
/// otherwise it may still be the trivial all-nodes cover.
pub fn solve(graph: &Graph, cutoff: Duration) -> Solution {
    if graph.is_empty() {
        return Solution {
            cover: Vec::new(),
            trace: Trace::new(),
            status: SolveStatus::Optimal,
        };
    }

    let mut search = Search::new(graph.clone(), cutoff);
    search.explore();

    let status = if search.interrupted {
        warn!(
            "branch and bound stopped at cutoff after {} states, incumbent {}",
            search.states, search.upper_bound
        );
        SolveStatus::CutoffReached
    } else {
        SolveStatus::Optimal
    };
    info!(
        "branch and bound: cover of {} in {:.3}s ({} states)",
        search.upper_bound,
        search.clock.elapsed_secs(),
        search.states
    );

    Solution {
        cover: graph.labels_of(search.best_cover),
        trace: search.trace,
        status,
    }
}

/// Mutable search context shared by every level of the search.
struct Search {
    clock: Clock,
    subgraph: Graph,
    cover: Vec<usize>,
    upper_bound: usize,
    best_cover: Vec<usize>,
    trace: Trace,
    interrupted: bool,
    states: u64,
}

impl Search {
    fn new(graph: Graph, cutoff: Duration) -> Self {
        // The trivial cover is the first incumbent.
        let best_cover: Vec<usize> = graph.nodes().collect();
        Self {
            clock: Clock::start(cutoff),
            upper_bound: best_cover.len(),
            best_cover,
            subgraph: graph,
            cover: Vec::new(),
            trace: Trace::new(),
            interrupted: false,
            states: 0,
        }
    }

    /// Depth-first walk over an explicit frame stack, so the depth of the
    /// search never touches the thread stack.
    fn explore(&mut self) {
        let mut frames = vec![Frame::Enter];
        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter => {
                    if let Some(removed) = self.enter() {
                        frames.push(Frame::Exclude(removed));
                        frames.push(Frame::Enter);
                    }
                }
                Frame::Exclude(removed) => {
                    self.cover.pop();
                    let depth = self.cover.len();
                    let forced = self.subgraph.remove_nodes(removed.neighbors().to_vec());
                    self.cover.extend(forced.iter().map(RemovedNode::node));
                    frames.push(Frame::Restore {
                        removed,
                        forced,
                        depth,
                    });
                    frames.push(Frame::Enter);
                }
                Frame::Restore {
                    removed,
                    forced,
                    depth,
                } => {
                    self.cover.truncate(depth);
                    self.subgraph.restore_nodes(forced);
                    self.subgraph.restore_node(removed);
                }
            }
        }
    }

    /// Visits the current state. Returns the branch node's removal record
    /// when the state is split, after putting the node in the cover.
    fn enter(&mut self) -> Option<RemovedNode> {
        if self.clock.expired() {
            self.interrupted = true;
            return None;
        }
        self.states += 1;

        let remaining_edges = self.subgraph.edge_count();
        if remaining_edges == 0 {
            if self.cover.len() < self.upper_bound {
                self.upper_bound = self.cover.len();
                self.best_cover.clone_from(&self.cover);
                self.trace.record(self.clock.elapsed_secs(), self.upper_bound);
                debug!(
                    "new incumbent {} at {:.3}s",
                    self.upper_bound,
                    self.clock.elapsed_secs()
                );
            }
            return None;
        }

        let (branch_node, max_degree) = self.subgraph.max_degree_node()?;
        let lower_bound = remaining_edges.div_ceil(max_degree);
        if self.cover.len() + lower_bound >= self.upper_bound {
            return None;
        }

        // Include the branch node first.
        let removed = self.subgraph.remove_node(branch_node);
        self.cover.push(branch_node);
        Some(removed)
    }
}

/// Pending work on the search stack.
enum Frame {
    /// Visit the state the subgraph and cover describe now.
    Enter,
    /// Include branch done: take the node back out of the cover and force
    /// its neighbors in instead.
    Exclude(RemovedNode),
    /// Both branches done: undo the removals of this level.
    Restore {
        removed: RemovedNode,
        forced: Vec<RemovedNode>,
        depth: usize,
    },
}
