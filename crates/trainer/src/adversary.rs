/// Opponent reply selection.
///
/// Every legal reply is scored; when the human just erred, replies that
/// capture, check or land on a human piece get extra weight and the window
/// of acceptable replies narrows. The final pick is uniform over the
/// replies within the window of the best one.

use chess_core::{MoveInfo, Snapshot};
use rand::Rng;
use tracing::debug;

use crate::history::{punish_pending, MoveRecord};
use crate::scorer::score_move;

/// Punish-mode bonuses
const PUNISH_CAPTURE_BONUS: i32 = 100;
const PUNISH_CHECK_BONUS: i32 = 60;
const PUNISH_TARGET_BONUS: i32 = 30;

/// Top-set windows
pub const PUNISH_WINDOW: i32 = 20;
pub const NORMAL_WINDOW: i32 = 50;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub mv: MoveInfo,
    /// Plain heuristic score, used for classifying the reply
    pub score: i32,
    /// Score plus any punish bonus, used for ranking
    pub adjusted: i32,
}

#[derive(Debug, Clone)]
pub struct ReplyPlan {
    pub candidates: Vec<Candidate>,
    /// Index of the first candidate with the maximum adjusted score
    pub best: Option<usize>,
    pub max_adjusted: i32,
    pub window: i32,
    pub punish: bool,
}

impl ReplyPlan {
    pub fn top_set(&self) -> Vec<&Candidate> {
        self.candidates
            .iter()
            .filter(|c| c.adjusted >= self.max_adjusted - self.window)
            .collect()
    }

    /// Uniform choice from the top set, falling back to the best candidate.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Candidate> {
        let top = self.top_set();
        if top.is_empty() {
            return self.best.map(|i| &self.candidates[i]);
        }
        Some(top[rng.gen_range(0..top.len())])
    }
}

/// Extra weight a reply gets while the human is being punished
pub fn punish_bonus(position: &Snapshot, mv: &MoveInfo) -> i32 {
    let mut bonus = 0;
    if mv.is_capture() {
        bonus += PUNISH_CAPTURE_BONUS;
    }
    if mv.is_check && !mv.is_checkmate {
        bonus += PUNISH_CHECK_BONUS;
    }
    if position
        .piece_at(mv.to)
        .is_some_and(|p| p.color != mv.piece.color)
    {
        bonus += PUNISH_TARGET_BONUS;
    }
    bonus
}

/// Score every legal reply for the side to move in `position`.
pub fn plan_reply(position: &Snapshot, history: &[MoveRecord]) -> ReplyPlan {
    let punish = punish_pending(history);
    let window = if punish { PUNISH_WINDOW } else { NORMAL_WINDOW };

    let mut candidates = Vec::new();
    let mut best: Option<usize> = None;
    let mut max_adjusted = i32::MIN;

    for mv in position.legal_moves() {
        let score = score_move(position, &mv);
        let adjusted = if punish {
            score + punish_bonus(position, &mv)
        } else {
            score
        };
        if adjusted > max_adjusted {
            max_adjusted = adjusted;
            best = Some(candidates.len());
        }
        candidates.push(Candidate {
            mv,
            score,
            adjusted,
        });
    }

    debug!(
        candidates = candidates.len(),
        max_adjusted, window, punish, "Planned reply"
    );

    ReplyPlan {
        candidates,
        best,
        max_adjusted,
        window,
        punish,
    }
}

/// Pick the opponent's reply. `None` means there is no legal move.
pub fn select_reply<R: Rng + ?Sized>(
    position: &Snapshot,
    history: &[MoveRecord],
    rng: &mut R,
) -> Option<Candidate> {
    let plan = plan_reply(position, history);
    plan.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Tier;
    use crate::history::Side;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn human(tier: Tier) -> MoveRecord {
        let snap = Snapshot::default();
        MoveRecord {
            side: Side::Human,
            mv: snap.find_move(&"e2e4".parse().unwrap()).unwrap(),
            score: 0,
            tier,
            explanation: String::new(),
            fen_after: String::new(),
        }
    }

    #[test]
    fn test_no_legal_moves() {
        let mated = Snapshot::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(select_reply(&mated, &[], &mut rng).is_none());
        let plan = plan_reply(&mated, &[]);
        assert!(plan.candidates.is_empty());
        assert!(plan.best.is_none());
    }

    #[test]
    fn test_window_depends_on_punish() {
        let snap = Snapshot::default();
        let calm = plan_reply(&snap, &[human(Tier::Good)]);
        assert!(!calm.punish);
        assert_eq!(calm.window, NORMAL_WINDOW);

        let punish = plan_reply(&snap, &[human(Tier::Mistake)]);
        assert!(punish.punish);
        assert_eq!(punish.window, PUNISH_WINDOW);
    }

    #[test]
    fn test_reply_is_in_top_set() {
        let snap = Snapshot::from_fen(crate::config::DEFAULT_START_FEN).unwrap();
        let plan = plan_reply(&snap, &[]);
        let top: Vec<String> = plan.top_set().iter().map(|c| c.mv.uci()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let reply = plan.choose(&mut rng).unwrap();
            assert!(top.contains(&reply.mv.uci()));
            assert!(reply.adjusted >= plan.max_adjusted - plan.window);
        }
    }

    #[test]
    fn test_punish_bonus() {
        // Black to move can take the hanging queen on g4
        let snap = Snapshot::from_fen(
            "rnbqkbnr/ppppp1pp/8/5p2/6Q1/4P3/PPPP1PPP/RNB1KBNR b KQkq - 1 2",
        )
        .unwrap();
        let take = snap.find_move(&"f5g4".parse().unwrap()).unwrap();
        assert_eq!(punish_bonus(&snap, &take), 130);
        let quiet = snap.find_move(&"a7a6".parse().unwrap()).unwrap();
        assert_eq!(punish_bonus(&snap, &quiet), 0);
    }

    #[test]
    fn test_punish_takes_the_queen() {
        let snap = Snapshot::from_fen(
            "rnbqkbnr/ppppp1pp/8/5p2/6Q1/4P3/PPPP1PPP/RNB1KBNR b KQkq - 1 2",
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let reply = select_reply(&snap, &[human(Tier::Mistake)], &mut rng).unwrap();
        assert_eq!(reply.mv.uci(), "f5g4");
    }
}
