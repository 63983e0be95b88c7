/// Move classification: score thresholds to tiers, plus a one-line explanation

use std::fmt;

use chess_core::{role_name, MoveInfo, Role};
use serde::{Deserialize, Serialize};

use crate::scorer::is_center;

/// Classification thresholds (inclusive lower bounds)
const THRESHOLD_BRILLIANT: i32 = 200;
const THRESHOLD_EXCELLENT: i32 = 100;
const THRESHOLD_GOOD: i32 = 50;
const THRESHOLD_OKAY: i32 = 0;
const THRESHOLD_INACCURACY: i32 = -50;

/// Explanation cut-offs
const GOOD_CHECK_MIN: i32 = 30;
const HANGS_MATERIAL_BELOW: i32 = -100;
const POSITIONAL_ABOVE: i32 = 20;
const WEAKENING_BELOW: i32 = -20;

/// Evaluation tier, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Mistake,
    Inaccuracy,
    Okay,
    Good,
    Excellent,
    Brilliant,
}

impl Tier {
    pub fn from_score(score: i32) -> Self {
        if score >= THRESHOLD_BRILLIANT {
            Tier::Brilliant
        } else if score >= THRESHOLD_EXCELLENT {
            Tier::Excellent
        } else if score >= THRESHOLD_GOOD {
            Tier::Good
        } else if score >= THRESHOLD_OKAY {
            Tier::Okay
        } else if score >= THRESHOLD_INACCURACY {
            Tier::Inaccuracy
        } else {
            Tier::Mistake
        }
    }

    /// INACCURACY or MISTAKE
    pub fn is_error(self) -> bool {
        self <= Tier::Inaccuracy
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Brilliant => "BRILLIANT",
            Tier::Excellent => "EXCELLENT",
            Tier::Good => "GOOD",
            Tier::Okay => "OKAY",
            Tier::Inaccuracy => "INACCURACY",
            Tier::Mistake => "MISTAKE",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: Tier,
    pub explanation: String,
}

pub fn classify(mv: &MoveInfo, score: i32) -> Classification {
    Classification {
        tier: Tier::from_score(score),
        explanation: explain(mv, score),
    }
}

/// First matching rule wins.
pub fn explain(mv: &MoveInfo, score: i32) -> String {
    if mv.is_checkmate {
        return "Checkmate! Game over.".to_string();
    }
    if let Some(captured) = mv.captured {
        let piece = role_name(captured);
        return if score > 0 {
            format!("Captures {piece}, winning material advantageously.")
        } else {
            format!("Captures {piece}, but this trade may not be favorable.")
        };
    }
    let text = if mv.is_check && score > GOOD_CHECK_MIN {
        "Gives check while maintaining good position."
    } else if mv.is_check {
        "Gives check, but may expose pieces unnecessarily."
    } else if score < HANGS_MATERIAL_BELOW {
        "Hangs a piece! This move loses material."
    } else if mv.is_castle {
        "Castles, improving king safety."
    } else if is_center(mv.to) {
        "Controls the center, a key strategic principle."
    } else if matches!(mv.role(), Role::Knight | Role::Bishop) {
        "Develops a piece, improving coordination."
    } else if score > POSITIONAL_ABOVE {
        "A strong positional move."
    } else if score < WEAKENING_BELOW {
        "Weakens the position or creates vulnerabilities."
    } else {
        "A solid, principled move."
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Snapshot;

    fn find(fen: &str, uci: &str) -> MoveInfo {
        Snapshot::from_fen(fen)
            .unwrap()
            .find_move(&uci.parse().unwrap())
            .unwrap()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_score(200), Tier::Brilliant);
        assert_eq!(Tier::from_score(199), Tier::Excellent);
        assert_eq!(Tier::from_score(100), Tier::Excellent);
        assert_eq!(Tier::from_score(50), Tier::Good);
        assert_eq!(Tier::from_score(49), Tier::Okay);
        assert_eq!(Tier::from_score(0), Tier::Okay);
        assert_eq!(Tier::from_score(-1), Tier::Inaccuracy);
        assert_eq!(Tier::from_score(-50), Tier::Inaccuracy);
        assert_eq!(Tier::from_score(-51), Tier::Mistake);
    }

    #[test]
    fn test_tier_order_and_serde() {
        assert!(Tier::Brilliant > Tier::Excellent);
        assert!(Tier::Inaccuracy > Tier::Mistake);
        assert!(Tier::Inaccuracy.is_error());
        assert!(!Tier::Okay.is_error());
        assert_eq!(serde_json::to_string(&Tier::Okay).unwrap(), "\"OKAY\"");
    }

    #[test]
    fn test_explanations() {
        let start = chess_core::STANDARD_START_FEN;
        assert_eq!(
            explain(&find(start, "e2e4"), 20),
            "Controls the center, a key strategic principle."
        );
        assert_eq!(
            explain(&find(start, "g1f3"), 15),
            "Develops a piece, improving coordination."
        );
        assert_eq!(explain(&find(start, "h2h3"), 0), "A solid, principled move.");
        assert_eq!(
            explain(&find(start, "h2h3"), -30),
            "Weakens the position or creates vulnerabilities."
        );
        assert_eq!(
            explain(&find(start, "h2h3"), -150),
            "Hangs a piece! This move loses material."
        );

        let capture = find("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1", "e4d5");
        assert_eq!(
            explain(&capture, 350),
            "Captures knight, winning material advantageously."
        );
        assert_eq!(
            explain(&capture, 0),
            "Captures knight, but this trade may not be favorable."
        );

        let mate = find("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", "a1a8");
        assert_eq!(explain(&mate, 10_000), "Checkmate! Game over.");

        let check = find("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a8");
        assert_eq!(
            explain(&check, 30),
            "Gives check, but may expose pieces unnecessarily."
        );
        assert_eq!(
            explain(&check, 31),
            "Gives check while maintaining good position."
        );

        let castle = find("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1");
        assert_eq!(explain(&castle, 25), "Castles, improving king safety.");
    }

    #[test]
    fn test_classify() {
        let mate = find("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", "a1a8");
        let c = classify(&mate, 10_000);
        assert_eq!(c.tier, Tier::Brilliant);
    }
}
