//! Puzzle loading and validation errors

use chess_core::ChessError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chess error: {0}")]
    Chess(#[from] ChessError),

    #[error("Puzzle {id}: solution step {step} ({mv}) is not playable: {reason}")]
    InvalidSolution {
        id: String,
        step: usize,
        mv: String,
        reason: String,
    },

    #[error("Puzzle {0} has an empty solution")]
    EmptySolution(String),
}
