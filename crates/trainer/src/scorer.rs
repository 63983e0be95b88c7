/// Heuristic single-ply move scoring.
/// Every term is evaluated on a copy of the position after the candidate
/// move; the caller's snapshot is never touched.

use chess_core::{ChessError, Color, MoveInfo, Rank, Role, Snapshot, Square};
use serde::Serialize;
use tracing::{debug, warn};

// Piece values
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 0;

/// Score of a mating move; a mating move never totals below this
pub const CHECKMATE_SCORE: i32 = 10_000;

const GOOD_TRADE_BONUS: i32 = 50;
const CHECK_BONUS: i32 = 30;
const CENTER_BONUS: i32 = 20;
const DEVELOPMENT_BONUS: i32 = 15;
const CASTLING_BONUS: i32 = 25;
const PAWN_ADVANCE_PER_RANK: i32 = 5;
const ISOLATED_PAWN_PENALTY: i32 = -10;

const CENTER: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

pub fn is_center(square: Square) -> bool {
    CENTER.contains(&square)
}

/// Per-term score of one candidate move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub material: i32,
    pub hanging: i32,
    pub check: i32,
    pub checkmate: i32,
    pub center: i32,
    pub development: i32,
    pub castling: i32,
    pub pawn_advance: i32,
    pub isolated_pawn: i32,
    pub threat: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        let sum = self.material
            + self.hanging
            + self.check
            + self.checkmate
            + self.center
            + self.development
            + self.castling
            + self.pawn_advance
            + self.isolated_pawn
            + self.threat;
        if self.checkmate > 0 {
            sum.max(CHECKMATE_SCORE)
        } else {
            sum
        }
    }
}

/// Score `mv`, falling back to a neutral 0 if it cannot be applied.
pub fn score_move(position: &Snapshot, mv: &MoveInfo) -> i32 {
    match score_breakdown(position, mv) {
        Ok(breakdown) => {
            let total = breakdown.total();
            debug!(mv = %mv, total, ?breakdown, "Scored move");
            total
        }
        Err(e) => {
            warn!(mv = %mv, error = %e, "Move evaluation failed, scoring 0");
            0
        }
    }
}

/// Evaluate every scoring term for `mv` played from `position`.
pub fn score_breakdown(position: &Snapshot, mv: &MoveInfo) -> Result<ScoreBreakdown, ChessError> {
    let after = position.play(mv)?;
    let mover = mv.piece.color;
    let mover_value = piece_value(mv.role());
    let captured_value = mv.captured.map(piece_value);

    let mut s = ScoreBreakdown::default();

    if let Some(captured) = captured_value {
        s.material = captured;
        if captured >= mover_value {
            s.material += GOOD_TRADE_BONUS;
        }
    }

    s.hanging = hanging_penalty(&after, mv, mover, mover_value, captured_value);

    if mv.is_checkmate {
        s.checkmate = CHECKMATE_SCORE;
    } else if mv.is_check {
        s.check = CHECK_BONUS;
    }

    if is_center(mv.to) {
        s.center = CENTER_BONUS;
    }

    if matches!(mv.role(), Role::Knight | Role::Bishop) && mv.from.rank() == back_rank(mover) {
        s.development = DEVELOPMENT_BONUS;
    }

    if mv.is_castle {
        s.castling = CASTLING_BONUS;
    }

    if mv.role() == Role::Pawn {
        s.pawn_advance = pawn_advance(mover, mv.to);
        if is_isolated(&after, mover, mv.to) {
            s.isolated_pawn = ISOLATED_PAWN_PENALTY;
        }
    }

    s.threat = threat_bonus(&after, mover, mv.to);

    Ok(s)
}

fn back_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    }
}

/// `after` has the opponent to move.
fn hanging_penalty(
    after: &Snapshot,
    mv: &MoveInfo,
    mover: Color,
    mover_value: i32,
    captured_value: Option<i32>,
) -> i32 {
    if !after.legal_move_lands_on(mv.to) {
        return 0;
    }
    let defended = after.attackers(mv.to, mover) > 0;
    match (defended, captured_value) {
        (false, _) => -2 * mover_value,
        (true, Some(captured)) if mover_value > captured => -(mover_value - captured),
        (true, Some(_)) => 0,
        (true, None) => -mover_value / 2,
    }
}

fn pawn_advance(mover: Color, to: Square) -> i32 {
    let rank = to.rank() as i32 + 1;
    let ranks_beyond = match mover {
        Color::White => rank - 4,
        Color::Black => 5 - rank,
    };
    ranks_beyond.max(0) * PAWN_ADVANCE_PER_RANK
}

fn is_isolated(after: &Snapshot, mover: Color, to: Square) -> bool {
    let file = to.file() as i32;
    !after
        .pawns_of(mover)
        .into_iter()
        .any(|sq| (sq.file() as i32 - file).abs() == 1)
}

/// Half the value of the most valuable enemy piece the moved piece attacks
/// that is attacked more often than it is defended.
fn threat_bonus(after: &Snapshot, mover: Color, to: Square) -> i32 {
    after
        .attacked_from(to)
        .into_iter()
        .filter_map(|sq| after.piece_at(sq).map(|p| (sq, p)))
        .filter(|(_, p)| p.color != mover && p.role != Role::King)
        .filter(|(sq, _)| after.attackers(*sq, mover) > after.attackers(*sq, !mover))
        .map(|(_, p)| piece_value(p.role))
        .max()
        .map_or(0, |v| v / 2)
}
