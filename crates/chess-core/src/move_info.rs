//! Verbose move records produced by the rules facade.

use std::fmt;

use shakmaty::{san::San, Chess, File, Move, Piece, Position, Role, Square};

use crate::notation::MoveRequest;

/// A legal move in a specific position, with everything the scorer and
/// classifier need to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveInfo {
    pub from: Square,
    /// For castling this is the king's destination, not the rook square.
    pub to: Square,
    pub promotion: Option<Role>,
    pub piece: Piece,
    pub captured: Option<Role>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_castle: bool,
    /// SAN with the `+` / `#` suffix.
    pub san: String,
    raw: Move,
}

impl MoveInfo {
    /// Describe `mv` as played from `pos`. `mv` must be legal in `pos`.
    pub fn from_move(pos: &Chess, mv: &Move) -> Self {
        let (from, to) = match *mv {
            Move::Normal { from, to, .. } | Move::EnPassant { from, to } => (from, to),
            Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() { File::G } else { File::C };
                (king, Square::from_coords(file, king.rank()))
            }
            Move::Put { to, .. } => (to, to),
        };

        let mut after = pos.clone();
        after.play_unchecked(mv.clone());
        let is_checkmate = after.is_checkmate();
        let is_check = after.is_check();

        let mut san = San::from_move(pos, mv.clone()).to_string();
        if is_checkmate {
            san.push('#');
        } else if is_check {
            san.push('+');
        }

        Self {
            from,
            to,
            promotion: mv.promotion(),
            piece: Piece {
                color: pos.turn(),
                role: mv.role(),
            },
            captured: mv.capture(),
            is_check,
            is_checkmate,
            is_castle: mv.is_castle(),
            san,
            raw: mv.clone(),
        }
    }

    pub fn role(&self) -> Role {
        self.piece.role
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// UCI text with the king's destination for castling, e.g. `e1g1`.
    pub fn uci(&self) -> String {
        self.request().uci()
    }

    /// The `(from, to, promotion)` triple for this move.
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// Whether a presentation-layer request picks this move. Promotion is only
    /// compared when the request names one.
    pub fn matches(&self, request: &MoveRequest) -> bool {
        if self.from != request.from || self.to != request.to {
            return false;
        }
        match request.promotion {
            Some(role) => self.promotion == Some(role),
            None => true,
        }
    }

    pub(crate) fn raw(&self) -> &Move {
        &self.raw
    }
}

impl fmt::Display for MoveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.san)
    }
}
