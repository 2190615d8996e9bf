//! Crate-wide error type.
//!
//! Only malformed input is an error. A search that runs out of time, exhausts
//! its space or has to undo a tentative move still produces a `Solution`.

use thiserror::Error;

/// Errors surfaced by graph loading, output handling and the driver.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument or graph element the library cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A graph file whose content disagrees with its header.
    #[error("malformed graph: {what} count is {found}, header declares {declared}")]
    MalformedGraph {
        what: &'static str,
        declared: usize,
        found: usize,
    },

    /// A token that could not be read as a number, or a missing header.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An algorithm name the driver does not know.
    #[error("unknown algorithm `{0}` (expected one of Approx, BnB, LS1, LS2, RW)")]
    UnknownAlgorithm(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
