//! Outbound session events.

use serde::Serialize;

use crate::classifier::Tier;
use crate::history::{MoveRecord, Side};

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    Checkmate,
    Stalemate,
    Draw,
}

/// Receives what a session reports to the presentation layer.
pub trait SessionObserver {
    fn on_move_classified(&mut self, record: &MoveRecord);

    fn on_puzzle_solved(&mut self, puzzle_id: &str);

    fn on_game_over(&mut self, reason: GameOverReason);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrainerEvent {
    MoveClassified {
        side: Side,
        san: String,
        uci: String,
        score: i32,
        tier: Tier,
        explanation: String,
        fen: String,
    },
    PuzzleSolved {
        puzzle_id: String,
    },
    GameOver {
        reason: GameOverReason,
    },
}

impl From<&MoveRecord> for TrainerEvent {
    fn from(record: &MoveRecord) -> Self {
        TrainerEvent::MoveClassified {
            side: record.side,
            san: record.mv.san.clone(),
            uci: record.mv.uci(),
            score: record.score,
            tier: record.tier,
            explanation: record.explanation.clone(),
            fen: record.fen_after.clone(),
        }
    }
}

/// Observer that keeps every event in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<TrainerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TrainerEvent] {
        &self.events
    }

    /// Remove and return everything recorded so far
    pub fn drain(&mut self) -> Vec<TrainerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SessionObserver for EventLog {
    fn on_move_classified(&mut self, record: &MoveRecord) {
        self.events.push(record.into());
    }

    fn on_puzzle_solved(&mut self, puzzle_id: &str) {
        self.events.push(TrainerEvent::PuzzleSolved {
            puzzle_id: puzzle_id.to_string(),
        });
    }

    fn on_game_over(&mut self, reason: GameOverReason) {
        self.events.push(TrainerEvent::GameOver { reason });
    }
}
