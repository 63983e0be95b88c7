/// In-memory solve streak tracking

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Distinct puzzle ids solved, in first-solve order
    pub solved_puzzles: Vec<String>,
    /// Successful attempts, repeats included
    pub total_solved: u32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of one puzzle attempt. A failure resets the current streak.
    pub fn record(&mut self, puzzle_id: &str, success: bool) {
        if !success {
            self.current_streak = 0;
            return;
        }
        self.current_streak += 1;
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.total_solved += 1;
        if !self.has_solved(puzzle_id) {
            self.solved_puzzles.push(puzzle_id.to_string());
        }
    }

    pub fn has_solved(&self, puzzle_id: &str) -> bool {
        self.solved_puzzles.iter().any(|id| id == puzzle_id)
    }
}
