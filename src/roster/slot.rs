// The fixed roster slot schema and per-slot eligibility.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::player::{Player, Position};

/// Identifier of one slot in the fixed classic-contest roster schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    Qb,
    Rb1,
    Rb2,
    Wr1,
    Wr2,
    Wr3,
    Te,
    Flex,
    Dst,
}

/// Slot display order, which is also the assignment engine's scan priority
/// for single-position slots. FLEX deliberately sits after every
/// single-position slot so it is resolved last and cannot starve them.
pub const SLOT_ORDER: [SlotId; 9] = [
    SlotId::Qb,
    SlotId::Rb1,
    SlotId::Rb2,
    SlotId::Wr1,
    SlotId::Wr2,
    SlotId::Wr3,
    SlotId::Te,
    SlotId::Flex,
    SlotId::Dst,
];

impl SlotId {
    /// Display string for this slot.
    pub fn display_str(&self) -> &'static str {
        match self {
            SlotId::Qb => "QB",
            SlotId::Rb1 => "RB1",
            SlotId::Rb2 => "RB2",
            SlotId::Wr1 => "WR1",
            SlotId::Wr2 => "WR2",
            SlotId::Wr3 => "WR3",
            SlotId::Te => "TE",
            SlotId::Flex => "FLEX",
            SlotId::Dst => "DST",
        }
    }

    /// Positions that may occupy this slot.
    pub fn eligible_positions(&self) -> &'static [Position] {
        match self {
            SlotId::Qb => &[Position::Quarterback],
            SlotId::Rb1 | SlotId::Rb2 => &[Position::RunningBack],
            SlotId::Wr1 | SlotId::Wr2 | SlotId::Wr3 => &[Position::WideReceiver],
            SlotId::Te => &[Position::TightEnd],
            SlotId::Flex => &[
                Position::RunningBack,
                Position::WideReceiver,
                Position::TightEnd,
            ],
            SlotId::Dst => &[Position::Defense],
        }
    }

    /// Whether this is the multi-position FLEX slot.
    pub fn is_flex(&self) -> bool {
        matches!(self, SlotId::Flex)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// One slot on the roster: its identity plus the player occupying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSlot {
    pub id: SlotId,
    pub player: Option<Player>,
}

impl RosterSlot {
    /// Whether the given position may occupy this slot.
    pub fn accepts(&self, position: Position) -> bool {
        self.id.eligible_positions().contains(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.player.is_none()
    }
}

/// Build the empty classic slot set in display order.
pub fn classic_slots() -> Vec<RosterSlot> {
    SLOT_ORDER
        .iter()
        .map(|&id| RosterSlot { id, player: None })
        .collect()
}
