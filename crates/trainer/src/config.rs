//! Trainer configuration from environment variables

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chess_core::Snapshot;

use crate::error::TrainerError;

/// Mid-game position used when analysis mode starts without a FEN
pub const DEFAULT_START_FEN: &str =
    "r2qkb1r/ppp2ppp/2n1bn2/3pp3/2PP4/2N1PN2/PP3PPP/R1BQKB1R w KQkq - 0 6";

#[derive(Clone, Debug, PartialEq)]
pub struct TrainerConfig {
    /// Pause before the opponent starts thinking
    pub reply_pause: Duration,

    /// Pause used instead when the human just erred
    pub punish_pause: Duration,

    /// Minimum thinking time on top of the pause
    pub think_min: Duration,

    /// Upper bound of the random thinking jitter
    pub think_jitter: Duration,

    /// Play opponent steps of a puzzle line automatically
    pub auto_reply: bool,

    /// Fixed seed for the opponent's random choice (unset = entropy)
    pub seed: Option<u64>,

    /// Puzzle JSON to load instead of the builtin set
    pub puzzles_path: Option<PathBuf>,

    /// Analysis-mode starting position
    pub start_fen: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            reply_pause: Duration::from_millis(500),
            punish_pause: Duration::from_millis(800),
            think_min: Duration::from_millis(1000),
            think_jitter: Duration::from_millis(1500),
            auto_reply: true,
            seed: None,
            puzzles_path: None,
            start_fen: DEFAULT_START_FEN.to_string(),
        }
    }
}

impl TrainerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, TrainerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Unparseable numbers
    /// and flags fall back to their defaults; an invalid start FEN is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TrainerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        let auto_reply = lookup("TRAINER_AUTO_REPLY")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.auto_reply);

        let seed = lookup("TRAINER_SEED").and_then(|v| v.trim().parse().ok());

        let puzzles_path = lookup("TRAINER_PUZZLES_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let start_fen = lookup("TRAINER_START_FEN")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.start_fen);
        Snapshot::from_fen(&start_fen)
            .map_err(|e| TrainerError::Config(format!("TRAINER_START_FEN: {e}")))?;

        Ok(Self {
            reply_pause: millis("TRAINER_REPLY_PAUSE_MS", defaults.reply_pause),
            punish_pause: millis("TRAINER_PUNISH_PAUSE_MS", defaults.punish_pause),
            think_min: millis("TRAINER_THINK_MIN_MS", defaults.think_min),
            think_jitter: millis("TRAINER_THINK_JITTER_MS", defaults.think_jitter),
            auto_reply,
            seed,
            puzzles_path,
            start_fen,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
