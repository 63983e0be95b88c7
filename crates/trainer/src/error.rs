//! Trainer error types

use chess_core::ChessError;
use chess_puzzler::PuzzleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Chess error: {0}")]
    Chess(#[from] ChessError),

    #[error("Puzzle error: {0}")]
    Puzzle(#[from] PuzzleError),

    #[error("No puzzle loaded")]
    NoPuzzleLoaded,

    #[error("Reply cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}
