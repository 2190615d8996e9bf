pub mod branch_and_bound;

pub use branch_and_bound::BranchAndBound;
