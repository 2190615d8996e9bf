pub mod priority_swap;
pub mod random_walk;
pub mod simulated_annealing;

pub use priority_swap::PrioritySwap;
pub use random_walk::RandomWalk;
pub use simulated_annealing::{AnnealingConfig, InitialState, SimulatedAnnealing};
