pub mod greedy_independent_cover;

pub use greedy_independent_cover::GreedyIndependentCover;
