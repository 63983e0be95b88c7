#![allow(dead_code)]

use std::time::Duration;

use chess_core::{MoveInfo, Snapshot};
use trainer::TrainerConfig;

/// Position from the knight-to-g5 puzzle: White to move, Bc4 already eyes f7.
pub const FORK_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 4 4";

/// After 1.e3 f5: the f5 pawn covers g4 and nothing White has defends it.
pub const QUEEN_HANG_FEN: &str = "rnbqkbnr/ppppp1pp/8/5p2/8/4P3/PPPP1PPP/RNBQKBNR w KQkq f6 0 2";

pub fn snapshot(fen: &str) -> Snapshot {
    Snapshot::from_fen(fen).unwrap_or_else(|e| panic!("bad test FEN {fen}: {e}"))
}

/// Look up a legal move by its text, panicking if it is not legal.
pub fn legal(position: &Snapshot, text: &str) -> MoveInfo {
    position
        .find_move(&text.parse().unwrap())
        .unwrap_or_else(|e| panic!("{text} not legal in {}: {e}", position.fen()))
}

/// Config with every delay set to zero.
pub fn instant_config() -> TrainerConfig {
    TrainerConfig {
        reply_pause: Duration::ZERO,
        punish_pause: Duration::ZERO,
        think_min: Duration::ZERO,
        think_jitter: Duration::ZERO,
        ..TrainerConfig::default()
    }
}
