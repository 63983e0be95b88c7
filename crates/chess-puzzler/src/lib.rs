//! Puzzle records, the puzzle catalog and solve-streak tracking.

pub mod error;
pub mod puzzle;

pub use error::PuzzleError;
pub use puzzle::catalog::{Catalog, PuzzleFilter};
pub use puzzle::progress::Progress;
pub use puzzle::{Difficulty, Puzzle, SolutionMove};
