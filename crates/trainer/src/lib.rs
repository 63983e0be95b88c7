//! Chess puzzle trainer core.
//!
//! Heuristic move scoring, move classification, the heuristic opponent,
//! puzzle solution matching and the session that ties them together.

pub mod adversary;
pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod matcher;
pub mod scorer;
pub mod session;
pub mod thinking;

pub use adversary::{plan_reply, select_reply, Candidate, ReplyPlan};
pub use classifier::{classify, Classification, Tier};
pub use config::TrainerConfig;
pub use error::TrainerError;
pub use events::{EventLog, GameOverReason, SessionObserver, TrainerEvent};
pub use history::{MoveRecord, Side};
pub use matcher::{MatchOutcome, PuzzleState, SolutionCursor};
pub use scorer::{score_breakdown, score_move, ScoreBreakdown};
pub use session::{Mode, MoveOutcome, Session, Verdict};
