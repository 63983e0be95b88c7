//! Training session: one position, one move history, one solution cursor.
//!
//! A session runs either a puzzle (moves are checked against the stored
//! line) or a free analysis game (moves are scored and classified, and the
//! heuristic opponent answers). All mutation goes through `&mut self`, so an
//! opponent reply can never interleave with a user attempt.

use std::collections::HashMap;
use std::time::Duration;

use chess_core::{Color, GameStatus, MoveInfo, MoveRequest, Snapshot};
use chess_puzzler::Puzzle;
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::adversary::select_reply;
use crate::classifier::{classify, Tier};
use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::events::{EventLog, GameOverReason, SessionObserver};
use crate::history::{punish_pending, MoveRecord, Side};
use crate::matcher::{MatchOutcome, PuzzleState, SolutionCursor};
use crate::scorer::score_move;
use crate::thinking::{thinking_time, wait_or_cancel};

const THREEFOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Puzzle,
    Analysis,
}

/// What happened to one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not a legal move in the current position
    Invalid,
    /// Legal, but not accepted right now (game over, solved, not your turn)
    Rejected,
    /// Puzzle step matched, more to come
    Correct,
    /// Puzzle step did not match
    Wrong,
    /// Puzzle step matched and finished the line
    Solved,
    /// Analysis move played and classified
    Classified(Tier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub feedback: String,
    pub verdict: Verdict,
}

impl MoveOutcome {
    fn accepted(verdict: Verdict, feedback: impl Into<String>) -> Self {
        Self {
            accepted: true,
            feedback: feedback.into(),
            verdict,
        }
    }

    fn refused(verdict: Verdict, feedback: impl Into<String>) -> Self {
        Self {
            accepted: false,
            feedback: feedback.into(),
            verdict,
        }
    }
}

#[derive(Debug, Clone)]
struct ActivePuzzle {
    puzzle: Puzzle,
    cursor: SolutionCursor,
}

pub struct Session<O: SessionObserver = EventLog> {
    config: TrainerConfig,
    observer: O,
    mode: Mode,
    position: Snapshot,
    start: Snapshot,
    human: Color,
    history: Vec<MoveRecord>,
    puzzle: Option<ActivePuzzle>,
    repetitions: HashMap<String, u32>,
    game_over: Option<GameOverReason>,
}

impl Session<EventLog> {
    pub fn new(config: TrainerConfig) -> Self {
        Self::with_observer(config, EventLog::new())
    }
}

impl<O: SessionObserver> Session<O> {
    pub fn with_observer(config: TrainerConfig, observer: O) -> Self {
        Self {
            config,
            observer,
            mode: Mode::Idle,
            position: Snapshot::default(),
            start: Snapshot::default(),
            human: Color::White,
            history: Vec::new(),
            puzzle: None,
            repetitions: HashMap::new(),
            game_over: None,
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn position(&self) -> &Snapshot {
        &self.position
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn human_color(&self) -> Color {
        self.human
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref().map(|p| &p.puzzle)
    }

    pub fn cursor(&self) -> Option<&SolutionCursor> {
        self.puzzle.as_ref().map(|p| &p.cursor)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// True when analysis mode is waiting on the opponent
    pub fn awaiting_reply(&self) -> bool {
        self.mode == Mode::Analysis && self.game_over.is_none() && self.position.turn() != self.human
    }

    /// Switch to puzzle mode. The solver plays the side to move in the FEN.
    pub fn load_puzzle(&mut self, puzzle: &Puzzle) -> Result<(), TrainerError> {
        puzzle.validate()?;
        let start = puzzle.start()?;
        let cursor = SolutionCursor::new(puzzle.solution_moves()?);

        self.reset_board(start);
        self.mode = Mode::Puzzle;
        self.puzzle = Some(ActivePuzzle {
            puzzle: puzzle.clone(),
            cursor,
        });

        info!(
            puzzle_id = %puzzle.id,
            difficulty = %puzzle.difficulty,
            steps = puzzle.solution.len(),
            solver_moves = puzzle.solver_move_count(),
            "Puzzle loaded"
        );
        Ok(())
    }

    /// Switch to analysis mode. The human plays the side to move.
    pub fn load_free_position(&mut self, fen: &str) -> Result<(), TrainerError> {
        let start = Snapshot::from_fen(fen)?;
        self.reset_board(start);
        self.mode = Mode::Analysis;
        self.puzzle = None;
        info!(fen = %fen, human = ?self.human, "Analysis position loaded");
        self.check_game_over();
        Ok(())
    }

    /// Back to the starting position of the current puzzle or game.
    pub fn restart(&mut self) -> Result<(), TrainerError> {
        if self.mode == Mode::Idle {
            return Err(TrainerError::NoPuzzleLoaded);
        }
        let start = self.start.clone();
        self.reset_board(start);
        if let Some(active) = self.puzzle.as_mut() {
            active.cursor.reset();
        }
        if self.mode == Mode::Analysis {
            self.check_game_over();
        }
        Ok(())
    }

    fn reset_board(&mut self, start: Snapshot) {
        self.human = start.turn();
        self.history.clear();
        self.repetitions.clear();
        self.repetitions.insert(start.position_key(), 1);
        self.game_over = None;
        self.position = start.clone();
        self.start = start;
    }

    /// Attempt a move given as square/piece strings from the presentation layer.
    pub fn attempt_move(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<&str>,
    ) -> Result<MoveOutcome, TrainerError> {
        let request = MoveRequest::parse(from, to, promotion)?;
        self.attempt(&request)
    }

    pub fn attempt(&mut self, request: &MoveRequest) -> Result<MoveOutcome, TrainerError> {
        match self.mode {
            Mode::Idle => Err(TrainerError::NoPuzzleLoaded),
            Mode::Puzzle => self.attempt_puzzle(request),
            Mode::Analysis => self.attempt_analysis(request),
        }
    }

    fn attempt_puzzle(&mut self, request: &MoveRequest) -> Result<MoveOutcome, TrainerError> {
        let active = self.puzzle.as_ref().ok_or(TrainerError::NoPuzzleLoaded)?;
        if active.cursor.state() == PuzzleState::Solved {
            return Ok(MoveOutcome::refused(
                Verdict::Rejected,
                "Puzzle already solved. Retry it or load another one.",
            ));
        }
        if self.game_over.is_some() {
            return Ok(MoveOutcome::refused(Verdict::Rejected, "The game is over."));
        }
        let Ok(mv) = self.position.find_move(request) else {
            return Ok(MoveOutcome::refused(Verdict::Invalid, "Invalid move!"));
        };

        if !active.cursor.is_expected(&mv) {
            let expected = active
                .cursor
                .next_expected()
                .map(|step| step.to_string())
                .unwrap_or_default();
            debug!(played = %mv.uci(), %expected, "Wrong puzzle move");
            return Ok(MoveOutcome::refused(
                Verdict::Wrong,
                format!("Not the solution: {}. Expected: {}", mv.request(), expected),
            ));
        }

        let score = score_move(&self.position, &mv);
        self.commit(Side::Human, mv.clone(), score)?;
        let mut outcome = self.cursor_mut()?.advance(&mv);

        if matches!(outcome, MatchOutcome::Correct { .. })
            && self.config.auto_reply
            && self.game_over.is_none()
        {
            outcome = self.play_puzzle_step()?;
        }

        match outcome {
            MatchOutcome::Solved => {
                let id = self.puzzle().map(|p| p.id.clone()).unwrap_or_default();
                info!(puzzle_id = %id, "Puzzle solved");
                self.observer.on_puzzle_solved(&id);
                Ok(MoveOutcome::accepted(Verdict::Solved, "Puzzle solved! Well done!"))
            }
            MatchOutcome::Correct { remaining } => {
                let plural = if remaining == 1 { "" } else { "s" };
                Ok(MoveOutcome::accepted(
                    Verdict::Correct,
                    format!("Correct! {remaining} move{plural} remaining."),
                ))
            }
            MatchOutcome::Wrong { .. } | MatchOutcome::AlreadySolved => Ok(MoveOutcome::refused(
                Verdict::Rejected,
                "Puzzle line could not be continued.",
            )),
        }
    }

    /// Play the next expected step for the opponent.
    fn play_puzzle_step(&mut self) -> Result<MatchOutcome, TrainerError> {
        let step = self
            .cursor()
            .and_then(|c| c.next_expected().copied())
            .ok_or(TrainerError::NoPuzzleLoaded)?;
        let mv = self.position.find_move(&step).map_err(|e| {
            warn!(step = %step, error = %e, "Puzzle reply is not playable");
            e
        })?;
        let score = score_move(&self.position, &mv);
        self.commit(Side::Adversary, mv.clone(), score)?;
        Ok(self.cursor_mut()?.advance(&mv))
    }

    fn cursor_mut(&mut self) -> Result<&mut SolutionCursor, TrainerError> {
        self.puzzle
            .as_mut()
            .map(|p| &mut p.cursor)
            .ok_or(TrainerError::NoPuzzleLoaded)
    }

    fn attempt_analysis(&mut self, request: &MoveRequest) -> Result<MoveOutcome, TrainerError> {
        if self.game_over.is_some() {
            return Ok(MoveOutcome::refused(Verdict::Rejected, "The game is over."));
        }
        if self.position.turn() != self.human {
            return Ok(MoveOutcome::refused(
                Verdict::Rejected,
                "Wait for your opponent's move.",
            ));
        }
        let Ok(mv) = self.position.find_move(request) else {
            return Ok(MoveOutcome::refused(Verdict::Invalid, "Invalid move!"));
        };

        let score = score_move(&self.position, &mv);
        let record = self.commit(Side::Human, mv, score)?;
        Ok(MoveOutcome::accepted(
            Verdict::Classified(record.tier),
            format!("{}: {}. {}", record.mv.san, record.tier, record.explanation),
        ))
    }

    /// How long the opponent should appear to think before replying
    pub fn reply_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        thinking_time(&self.config, punish_pending(&self.history), rng)
    }

    /// Play the opponent's reply in analysis mode. Returns `None` when there
    /// is nothing to do: wrong mode, human to move, or the game is over.
    pub fn respond<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<MoveRecord>, TrainerError> {
        if !self.awaiting_reply() {
            return Ok(None);
        }
        let Some(reply) = select_reply(&self.position, &self.history, rng) else {
            self.check_game_over();
            return Ok(None);
        };
        debug!(reply = %reply.mv, score = reply.score, adjusted = reply.adjusted, "Opponent reply");
        let record = self.commit(Side::Adversary, reply.mv, reply.score)?;
        Ok(Some(record))
    }

    /// Wait `delay`, then reply. A cancelled wait leaves the position untouched.
    pub async fn respond_after<R: Rng + ?Sized>(
        &mut self,
        delay: Duration,
        cancel: &mut watch::Receiver<bool>,
        rng: &mut R,
    ) -> Result<Option<MoveRecord>, TrainerError> {
        if !self.awaiting_reply() {
            return Ok(None);
        }
        wait_or_cancel(delay, cancel).await?;
        self.respond(rng)
    }

    fn commit(&mut self, side: Side, mv: MoveInfo, score: i32) -> Result<MoveRecord, TrainerError> {
        let next = self.position.play(&mv)?;
        let classification = classify(&mv, score);
        self.position = next;
        *self
            .repetitions
            .entry(self.position.position_key())
            .or_insert(0) += 1;

        let record = MoveRecord {
            side,
            mv,
            score,
            tier: classification.tier,
            explanation: classification.explanation,
            fen_after: self.position.fen(),
        };
        debug!(side = ?side, mv = %record.mv, score, tier = %record.tier, "Move committed");
        self.history.push(record.clone());
        self.observer.on_move_classified(&record);
        self.check_game_over();
        Ok(record)
    }

    fn check_game_over(&mut self) {
        if self.game_over.is_some() {
            return;
        }
        let reason = match self.position.status() {
            GameStatus::Checkmate => Some(GameOverReason::Checkmate),
            GameStatus::Stalemate => Some(GameOverReason::Stalemate),
            GameStatus::InsufficientMaterial | GameStatus::FiftyMoveRule => {
                Some(GameOverReason::Draw)
            }
            GameStatus::Ongoing => {
                let seen = self
                    .repetitions
                    .get(&self.position.position_key())
                    .copied()
                    .unwrap_or(0);
                (seen >= THREEFOLD).then_some(GameOverReason::Draw)
            }
        };
        if let Some(reason) = reason {
            info!(reason = ?reason, fen = %self.position.fen(), "Game over");
            self.game_over = Some(reason);
            self.observer.on_game_over(reason);
        }
    }
}
