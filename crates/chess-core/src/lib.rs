//! Rules-engine facade for the puzzle trainer.
//!
//! Wraps shakmaty behind value-semantics position snapshots and verbose move
//! records, so the trainer never mutates a shared position: applying a move
//! always yields a new `Snapshot`.

pub mod error;
pub mod move_info;
pub mod notation;
pub mod snapshot;

pub use error::ChessError;
pub use move_info::MoveInfo;
pub use notation::{parse_role, parse_square, role_name, MoveRequest};
pub use snapshot::{GameStatus, Snapshot, STANDARD_START_FEN};

pub use shakmaty::{Color, File, Piece, Rank, Role, Square};
