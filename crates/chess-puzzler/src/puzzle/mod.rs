/// Puzzle data model

pub mod catalog;
pub mod progress;

use std::fmt;
use std::str::FromStr;

use chess_core::{MoveRequest, Snapshot};
use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// Difficulty levels, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
    Grandmaster,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
        Difficulty::Master,
        Difficulty::Grandmaster,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
            Difficulty::Grandmaster => "grandmaster",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| format!("unknown difficulty '{}'", s.trim()))
    }
}

/// One step of a solution line as stored in puzzle JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionMove {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl SolutionMove {
    pub fn to_request(&self) -> Result<MoveRequest, chess_core::ChessError> {
        MoveRequest::parse(&self.from, &self.to, self.promotion.as_deref())
    }
}

impl fmt::Display for SolutionMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)?;
        if let Some(p) = &self.promotion {
            write!(f, "={}", p.to_ascii_uppercase())?;
        }
        Ok(())
    }
}

/// A puzzle record. The solution alternates solver and opponent plies,
/// starting with the side to move in `fen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub fen: String,
    pub solution: Vec<SolutionMove>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Puzzle {
    /// Starting position
    pub fn start(&self) -> Result<Snapshot, PuzzleError> {
        Ok(Snapshot::from_fen(&self.fen)?)
    }

    /// Solution parsed into typed move requests
    pub fn solution_moves(&self) -> Result<Vec<MoveRequest>, PuzzleError> {
        if self.solution.is_empty() {
            return Err(PuzzleError::EmptySolution(self.id.clone()));
        }
        self.solution
            .iter()
            .map(|m| m.to_request().map_err(PuzzleError::from))
            .collect()
    }

    /// Number of moves the solver has to find
    pub fn solver_move_count(&self) -> usize {
        self.solution.len().div_ceil(2)
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t.eq_ignore_ascii_case(theme))
    }

    /// Replay the whole solution from the starting position.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let moves = self.solution_moves()?;
        let mut snap = self.start()?;
        for (step, request) in moves.iter().enumerate() {
            let invalid = |reason: String| PuzzleError::InvalidSolution {
                id: self.id.clone(),
                step: step + 1,
                mv: request.to_string(),
                reason,
            };
            let mv = snap.find_move(request).map_err(|e| invalid(e.to_string()))?;
            snap = snap.play(&mv).map_err(|e| invalid(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, Role, Square};

    fn fork_puzzle() -> Puzzle {
        serde_json::from_str(
            r#"{
                "id": "tactics-fork-001",
                "fen": "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 4 4",
                "solution": [{ "from": "f3", "to": "g5" }],
                "themes": ["fork", "double-attack"],
                "category": "tactics",
                "difficulty": "intermediate",
                "rating": 1280,
                "title": "Knight Fork"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_puzzle() {
        let puzzle = fork_puzzle();
        assert_eq!(puzzle.difficulty, Difficulty::Intermediate);
        assert_eq!(puzzle.description, None);
        assert!(puzzle.has_theme("Fork"));
        assert_eq!(puzzle.start().unwrap().turn(), Color::White);
        assert_eq!(
            puzzle.solution_moves().unwrap(),
            vec![MoveRequest::new(Square::F3, Square::G5)]
        );
        puzzle.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_illegal_step() {
        let mut puzzle = fork_puzzle();
        puzzle.solution.push(SolutionMove {
            from: "e2".into(),
            to: "e4".into(),
            promotion: None,
        });
        match puzzle.validate() {
            Err(PuzzleError::InvalidSolution { step, .. }) => assert_eq!(step, 2),
            other => panic!("expected InvalidSolution, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_solution() {
        let mut puzzle = fork_puzzle();
        puzzle.solution.clear();
        assert!(matches!(
            puzzle.validate(),
            Err(PuzzleError::EmptySolution(_))
        ));
    }

    #[test]
    fn test_solution_move_promotion() {
        let step = SolutionMove {
            from: "a7".into(),
            to: "a8".into(),
            promotion: Some("q".into()),
        };
        assert_eq!(step.to_request().unwrap().promotion, Some(Role::Queen));
        assert_eq!(step.to_string(), "a7-a8=Q");
    }

    #[test]
    fn test_difficulty_parse_and_order() {
        assert_eq!("Expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("easy".parse::<Difficulty>().is_err());
        assert!(Difficulty::Beginner < Difficulty::Grandmaster);
    }

    #[test]
    fn test_solver_move_count() {
        let mut puzzle = fork_puzzle();
        assert_eq!(puzzle.solver_move_count(), 1);
        puzzle.solution.push(puzzle.solution[0].clone());
        puzzle.solution.push(puzzle.solution[0].clone());
        assert_eq!(puzzle.solver_move_count(), 2);
    }
}
