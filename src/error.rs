//! Error kinds of the maze core

use thiserror::Error;

use crate::grid::Position;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, MazeError>;

/// Failures surfaced by the grid, the spawner and the loader.
///
/// An exhausted search is not an error; see [crate::solver::SearchOutcome].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("position {pos} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        pos: Position,
        rows: usize,
        cols: usize,
    },
    #[error("grid has no hall cell to place the traveler or the prize on")]
    NoTraversableCell,
    #[error("malformed maze input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
}
