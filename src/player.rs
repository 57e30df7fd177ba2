// Player pool domain types: positions and pool entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions used for roster slot eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Defense,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles the abbreviations the player pool feed uses:
    /// - "QB" -> Quarterback, "RB" -> RunningBack, "WR" -> WideReceiver
    /// - "TE" -> TightEnd, "DST"/"DEF"/"D" -> Defense
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "DST" | "DEF" | "D" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Defense => "DST",
        }
    }

    /// Whether this position is eligible for the FLEX slot (RB/WR/TE).
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// One entry in the weekly player pool.
///
/// `excluded` players are ineligible for assignment and candidate ranking.
/// `tier` is the pool's 1..=4 quality band (1 = premium).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub team: String,
    pub salary: u32,
    pub projected_points: f64,
    #[serde(default)]
    pub excluded: bool,
    pub tier: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("QB"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("RB"), Some(Position::RunningBack));
        assert_eq!(Position::from_str_pos("WR"), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("TE"), Some(Position::TightEnd));
        assert_eq!(Position::from_str_pos("DST"), Some(Position::Defense));
    }

    #[test]
    fn from_str_pos_defense_aliases() {
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("D"), Some(Position::Defense));
    }

    #[test]
    fn from_str_pos_case_insensitive() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("Wr"), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("dst"), Some(Position::Defense));
    }

    #[test]
    fn from_str_pos_invalid() {
        assert_eq!(Position::from_str_pos("K"), None);
        assert_eq!(Position::from_str_pos(""), None);
        assert_eq!(Position::from_str_pos("FLEX"), None);
    }

    #[test]
    fn display_str_roundtrip() {
        let positions = [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Defense,
        ];
        for pos in positions {
            let parsed = Position::from_str_pos(pos.display_str());
            assert_eq!(parsed, Some(pos), "roundtrip failed for {}", pos);
        }
    }

    #[test]
    fn flex_eligibility() {
        assert!(Position::RunningBack.is_flex_eligible());
        assert!(Position::WideReceiver.is_flex_eligible());
        assert!(Position::TightEnd.is_flex_eligible());
        assert!(!Position::Quarterback.is_flex_eligible());
        assert!(!Position::Defense.is_flex_eligible());
    }
}
