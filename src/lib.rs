//! # covers
//!
//! Anytime solvers for the minimum vertex cover problem. Every solver takes a
//! graph and a wall-clock budget and returns a feasible cover together with a
//! trace of `(elapsed, quality)` improvements.
//!
//! ```
//! use std::time::Duration;
//! use covers::cs::graph::Graph;
//! use covers::cs::combinatorial::branch_and_bound;
//!
//! let graph = Graph::from_edges(&[(1, 2), (2, 3), (1, 3)]).unwrap();
//! let solution = branch_and_bound::solve(&graph, Duration::from_secs(1));
//! assert_eq!(solution.cover.len(), 2);
//! ```

pub mod cs;
pub mod error;

pub use cs::{approx, combinatorial, experiment, graph, optimization, solver};
pub use error::{Error, Result};
