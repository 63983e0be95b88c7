//! Square, piece and move-text parsing.
//!
//! Move text is what a user types or a puzzle record stores: `e2e4`,
//! `f3-g5`, `e7e8q`, `e7e8=Q`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use shakmaty::{Role, Square};

use crate::error::ChessError;

static MOVE_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-h][1-8])\s*[-x]?\s*([a-h][1-8])\s*=?\s*([qrbnQRBN])?$").unwrap()
});

/// Parse a two-character square name (`a1`..`h8`).
pub fn parse_square(text: &str) -> Result<Square, ChessError> {
    text.trim()
        .to_ascii_lowercase()
        .parse::<Square>()
        .map_err(|_| ChessError::InvalidSquare(text.to_string()))
}

/// Parse a piece kind, either the full name or its letter.
pub fn parse_role(text: &str) -> Result<Role, ChessError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "p" | "pawn" => Ok(Role::Pawn),
        "n" | "knight" => Ok(Role::Knight),
        "b" | "bishop" => Ok(Role::Bishop),
        "r" | "rook" => Ok(Role::Rook),
        "q" | "queen" => Ok(Role::Queen),
        "k" | "king" => Ok(Role::King),
        _ => Err(ChessError::InvalidPiece(text.to_string())),
    }
}

pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "pawn",
        Role::Knight => "knight",
        Role::Bishop => "bishop",
        Role::Rook => "rook",
        Role::Queen => "queen",
        Role::King => "king",
    }
}

fn role_letter(role: Role) -> char {
    match role {
        Role::Pawn => 'p',
        Role::Knight => 'n',
        Role::Bishop => 'b',
        Role::Rook => 'r',
        Role::Queen => 'q',
        Role::King => 'k',
    }
}

/// A move attempt as the presentation layer sends it: from, to and an
/// optional promotion piece. Also the typed form of a puzzle solution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, role: Role) -> Self {
        self.promotion = Some(role);
        self
    }

    /// Build a request from the separate square/piece strings of a UI event.
    pub fn parse(from: &str, to: &str, promotion: Option<&str>) -> Result<Self, ChessError> {
        let request = Self::new(parse_square(from)?, parse_square(to)?);
        match promotion {
            Some(p) if !p.trim().is_empty() => Ok(request.with_promotion(parse_role(p)?)),
            _ => Ok(request),
        }
    }

    /// UCI form, e.g. `e7e8q`.
    pub fn uci(&self) -> String {
        match self.promotion {
            Some(role) => format!("{}{}{}", self.from, self.to, role_letter(role)),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl FromStr for MoveRequest {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let caps = MOVE_TEXT_RE
            .captures(text)
            .ok_or_else(|| ChessError::InvalidMove(text.to_string()))?;
        Self::parse(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()))
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "={}", role_letter(role).to_ascii_uppercase())?;
        }
        Ok(())
    }
}
