//! Rules-engine error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid piece: {0}")]
    InvalidPiece(String),

    #[error("Invalid move text: {0}")]
    InvalidMove(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}
