//! Value-semantics position snapshot over shakmaty.

use serde::Serialize;
use shakmaty::{
    fen::Fen, CastlingMode, Chess, Color, EnPassantMode, Piece, Position, Role, Square,
};

use crate::error::ChessError;
use crate::move_info::MoveInfo;
use crate::notation::MoveRequest;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Outcome state of a position, as far as the rules alone can tell.
/// Threefold repetition needs history and is tracked by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
}

/// An owned position. Applying a move returns a new snapshot and leaves
/// this one untouched.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pos: Chess,
}

impl Snapshot {
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let invalid = |reason: String| ChessError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let pos = parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;
        Ok(Self { pos })
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    /// FEN without the move counters, for repetition tracking.
    pub fn position_key(&self) -> String {
        let fen = self.fen();
        fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pos.board().piece_at(square)
    }

    pub fn legal_moves(&self) -> Vec<MoveInfo> {
        self.pos
            .legal_moves()
            .iter()
            .map(|m| MoveInfo::from_move(&self.pos, m))
            .collect()
    }

    pub fn legal_moves_from(&self, square: Square) -> Vec<MoveInfo> {
        self.pos
            .legal_moves()
            .iter()
            .filter(|m| m.from() == Some(square))
            .map(|m| MoveInfo::from_move(&self.pos, m))
            .collect()
    }

    /// Whether the side to move has a legal move, castling aside, that ends
    /// on `square`.
    pub fn legal_move_lands_on(&self, square: Square) -> bool {
        self.pos
            .legal_moves()
            .iter()
            .any(|m| !m.is_castle() && m.to() == square)
    }

    /// Look up the legal move a request refers to. An unspecified promotion
    /// defaults to a queen.
    pub fn find_move(&self, request: &MoveRequest) -> Result<MoveInfo, ChessError> {
        let candidates: Vec<MoveInfo> = self
            .legal_moves_from(request.from)
            .into_iter()
            .filter(|m| m.matches(request))
            .collect();

        let chosen = if candidates.len() > 1 {
            candidates
                .into_iter()
                .find(|m| m.promotion == Some(Role::Queen))
        } else {
            candidates.into_iter().next()
        };
        chosen.ok_or_else(|| ChessError::IllegalMove(request.to_string()))
    }

    /// Apply a move produced from this snapshot.
    pub fn play(&self, mv: &MoveInfo) -> Result<Snapshot, ChessError> {
        let pos = self
            .pos
            .clone()
            .play(mv.raw().clone())
            .map_err(|_| ChessError::IllegalMove(mv.uci()))?;
        Ok(Snapshot { pos })
    }

    pub fn status(&self) -> GameStatus {
        if self.pos.is_checkmate() {
            GameStatus::Checkmate
        } else if self.pos.is_stalemate() {
            GameStatus::Stalemate
        } else if self.pos.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if self.pos.halfmoves() >= 100 {
            GameStatus::FiftyMoveRule
        } else {
            GameStatus::Ongoing
        }
    }

    /// Number of `color` pieces attacking `square`.
    pub fn attackers(&self, square: Square, color: Color) -> usize {
        let board = self.pos.board();
        board.attacks_to(square, color, board.occupied()).count()
    }

    /// Squares attacked by whatever stands on `square`.
    pub fn attacked_from(&self, square: Square) -> Vec<Square> {
        self.pos.board().attacks_from(square).into_iter().collect()
    }

    pub fn pawns_of(&self, color: Color) -> Vec<Square> {
        let board = self.pos.board();
        (board.pawns() & board.by_color(color)).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let snap = Snapshot::default();
        assert_eq!(snap.fen(), STANDARD_START_FEN);
        assert_eq!(snap.legal_moves().len(), 20);
        assert_eq!(snap.legal_moves_from(Square::G1).len(), 2);
        assert_eq!(snap.status(), GameStatus::Ongoing);
    }

    #[test]
    fn test_invalid_fen() {
        let err = Snapshot::from_fen("not a fen").unwrap_err();
        assert!(matches!(err, ChessError::InvalidFen { .. }));
    }

    #[test]
    fn test_play_leaves_original_untouched() {
        let snap = Snapshot::default();
        let mv = snap.find_move(&"e2e4".parse().unwrap()).unwrap();
        let next = snap.play(&mv).unwrap();
        assert_eq!(snap.fen(), STANDARD_START_FEN);
        assert_eq!(next.turn(), Color::Black);
        assert_eq!(
            next.piece_at(Square::E4),
            Some(Piece {
                color: Color::White,
                role: Role::Pawn
            })
        );
    }

    #[test]
    fn test_fen_after_play() {
        let snap = Snapshot::default();
        let mv = snap.find_move(&"e2e4".parse().unwrap()).unwrap();
        assert_eq!(mv.san, "e4");
        // No black pawn can take en passant, so the square is omitted
        assert_eq!(
            snap.play(&mv).unwrap().fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_find_move_rejects_illegal() {
        let snap = Snapshot::default();
        let err = snap.find_move(&"e2e5".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ChessError::IllegalMove(_)));
    }

    #[test]
    fn test_find_move_defaults_promotion_to_queen() {
        let snap = Snapshot::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mv = snap.find_move(&"a7a8".parse().unwrap()).unwrap();
        assert_eq!(mv.promotion, Some(Role::Queen));
        let mv = snap.find_move(&"a7a8n".parse().unwrap()).unwrap();
        assert_eq!(mv.promotion, Some(Role::Knight));
    }

    #[test]
    fn test_status_checkmate_and_stalemate() {
        let mated = Snapshot::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1").unwrap();
        assert_eq!(mated.status(), GameStatus::Checkmate);
        assert!(mated.legal_moves().is_empty());

        let stale = Snapshot::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(stale.status(), GameStatus::Stalemate);
    }

    #[test]
    fn test_attack_queries() {
        let snap = Snapshot::default();
        // f3 is covered by the e2 and g2 pawns and the g1 knight
        assert_eq!(snap.attackers(Square::F3, Color::White), 3);
        assert_eq!(snap.attackers(Square::F3, Color::Black), 0);
        assert_eq!(snap.attacked_from(Square::B1).len(), 3);
        assert_eq!(snap.pawns_of(Color::Black).len(), 8);
        assert!(snap.legal_move_lands_on(Square::F3));
        assert!(!snap.legal_move_lands_on(Square::E5));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&GameStatus::FiftyMoveRule).unwrap();
        assert_eq!(json, "\"fifty_move_rule\"");
    }

    #[test]
    fn test_position_key_ignores_counters() {
        let a = Snapshot::from_fen("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        let b = Snapshot::from_fen("8/8/8/8/8/8/8/K6k w - - 12 40").unwrap();
        assert_eq!(a.position_key(), b.position_key());
    }
}
