/// Puzzle solution matching

use chess_core::{MoveInfo, MoveRequest};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleState {
    AwaitingMove,
    Solved,
}

/// Result of comparing one played move with the expected line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Matched; `remaining` steps of the line are still to be played
    Correct { remaining: usize },
    /// Matched the final step
    Solved,
    /// Did not match; the cursor did not move
    Wrong { expected: MoveRequest },
    /// The puzzle was already solved
    AlreadySolved,
}

#[derive(Debug, Clone)]
pub struct SolutionCursor {
    expected: Vec<MoveRequest>,
    position: usize,
    state: PuzzleState,
}

impl SolutionCursor {
    pub fn new(expected: Vec<MoveRequest>) -> Self {
        let state = if expected.is_empty() {
            PuzzleState::Solved
        } else {
            PuzzleState::AwaitingMove
        };
        Self {
            expected,
            position: 0,
            state,
        }
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.expected.len() - self.position
    }

    pub fn expected(&self) -> &[MoveRequest] {
        &self.expected
    }

    /// The step to be played next, if any
    pub fn next_expected(&self) -> Option<&MoveRequest> {
        match self.state {
            PuzzleState::AwaitingMove => self.expected.get(self.position),
            PuzzleState::Solved => None,
        }
    }

    /// Whether `mv` is the expected step. From/to must match; promotion is
    /// only compared when the step names one.
    pub fn is_expected(&self, mv: &MoveInfo) -> bool {
        self.next_expected().is_some_and(|step| mv.matches(step))
    }

    /// Compare `mv` with the expected step and advance on a match.
    pub fn advance(&mut self, mv: &MoveInfo) -> MatchOutcome {
        let Some(step) = self.next_expected().copied() else {
            return MatchOutcome::AlreadySolved;
        };
        if !mv.matches(&step) {
            return MatchOutcome::Wrong { expected: step };
        }
        self.position += 1;
        if self.position == self.expected.len() {
            self.state = PuzzleState::Solved;
            MatchOutcome::Solved
        } else {
            MatchOutcome::Correct {
                remaining: self.remaining(),
            }
        }
    }

    /// Rewind to the first step for another attempt
    pub fn reset(&mut self) {
        *self = Self::new(std::mem::take(&mut self.expected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Snapshot;

    const FORK_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 4 4";

    fn mv(snap: &Snapshot, uci: &str) -> MoveInfo {
        snap.find_move(&uci.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_single_step_solve() {
        let snap = Snapshot::from_fen(FORK_FEN).unwrap();
        let mut cursor = SolutionCursor::new(vec!["f3g5".parse().unwrap()]);

        let outcome = cursor.advance(&mv(&snap, "d3d4"));
        assert_eq!(
            outcome,
            MatchOutcome::Wrong {
                expected: "f3g5".parse().unwrap()
            }
        );
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.state(), PuzzleState::AwaitingMove);

        assert_eq!(cursor.advance(&mv(&snap, "f3g5")), MatchOutcome::Solved);
        assert_eq!(cursor.state(), PuzzleState::Solved);
        assert_eq!(cursor.advance(&mv(&snap, "f3g5")), MatchOutcome::AlreadySolved);
    }

    #[test]
    fn test_multi_step_and_reset() {
        let snap = Snapshot::from_fen(FORK_FEN).unwrap();
        let line = vec![
            "f3g5".parse().unwrap(),
            "d7d6".parse().unwrap(),
            "c4f7".parse().unwrap(),
        ];
        let mut cursor = SolutionCursor::new(line);
        assert_eq!(
            cursor.advance(&mv(&snap, "f3g5")),
            MatchOutcome::Correct { remaining: 2 }
        );
        assert_eq!(cursor.position(), 1);

        cursor.reset();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.expected().len(), 3);
        assert!(cursor.is_expected(&mv(&snap, "f3g5")));
    }

    #[test]
    fn test_promotion_comparison() {
        let snap = Snapshot::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();

        let mut loose = SolutionCursor::new(vec!["a7a8".parse().unwrap()]);
        assert!(loose.is_expected(&mv(&snap, "a7a8n")));

        let strict = SolutionCursor::new(vec!["a7a8q".parse().unwrap()]);
        assert!(!strict.is_expected(&mv(&snap, "a7a8n")));
        assert!(strict.is_expected(&mv(&snap, "a7a8q")));
        assert_eq!(loose.advance(&mv(&snap, "a7a8")), MatchOutcome::Solved);
    }
}
