pub mod cover;
pub mod io;
pub mod model;

pub use cover::CoverChecker;
pub use io::{load_graph, read_graph, write_solution, write_trace};
pub use model::{Graph, RemovedNode};
