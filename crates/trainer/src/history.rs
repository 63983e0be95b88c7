/// Move history entries

use chess_core::MoveInfo;
use serde::Serialize;

use crate::classifier::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Human,
    Adversary,
}

/// One committed move and how it was judged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub side: Side,
    pub mv: MoveInfo,
    pub score: i32,
    pub tier: Tier,
    pub explanation: String,
    pub fen_after: String,
}

/// True when the last committed move is a human INACCURACY or MISTAKE.
/// Derived on demand, never stored.
pub fn punish_pending(history: &[MoveRecord]) -> bool {
    history
        .last()
        .is_some_and(|r| r.side == Side::Human && r.tier.is_error())
}
