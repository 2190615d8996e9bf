pub mod approx;
pub mod combinatorial;
pub mod experiment;
pub mod graph;
pub mod optimization;
pub mod solver;

// Re-export the shared solver contract
pub use graph::{CoverChecker, Graph};
pub use solver::{Algorithm, CoverSolver, Solution, SolveStatus, Trace, TraceEntry};
