// Roster state and the assignment engine: deterministic placement of
// players into eligible, unoccupied slots.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::optimizer::OptimizedLineup;
use crate::player::{Player, Position};

use super::slot::{classic_slots, RosterSlot, SlotId};

/// Why a candidate could not be placed. These are normal, expected
/// outcomes surfaced to the caller as typed values, never silently
/// dropped and never treated as system errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("player {player_id} already occupies a roster slot")]
    DuplicatePlayer { player_id: String },

    #[error("no eligible open slot for position {position}")]
    NoEligibleSlot { position: Position },

    #[error("player {player_id} is excluded from the pool")]
    ExcludedPlayer { player_id: String },
}

/// The ordered collection of roster slots for one session.
///
/// Created empty, mutated by assign/unassign, and cleared by `clear`.
/// Slot mutation is synchronous and must be serialized by the caller; the
/// derived cap totals live in `summary` and are never stored here, so they
/// cannot drift from the slot collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterState {
    slots: Vec<RosterSlot>,
}

impl Default for RosterState {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterState {
    /// Create an empty roster with the classic slot schema.
    pub fn new() -> Self {
        RosterState {
            slots: classic_slots(),
        }
    }

    /// Read-only view of all slots in display order.
    pub fn slots(&self) -> &[RosterSlot] {
        &self.slots
    }

    /// The slot with the given id.
    pub fn slot(&self, id: SlotId) -> &RosterSlot {
        // The schema is fixed; every SlotId exists exactly once.
        self.slots
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| unreachable!("slot {id} missing from fixed schema"))
    }

    /// Whether a player already occupies any slot.
    pub fn has_player(&self, player_id: &str) -> bool {
        self.slots
            .iter()
            .any(|s| s.player.as_ref().is_some_and(|p| p.player_id == player_id))
    }

    /// Number of filled slots.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }

    /// Assign a player to the first eligible open slot.
    ///
    /// Single-position slots are scanned in schema order before FLEX, so an
    /// interactive pick can never starve a dedicated slot of its only
    /// eligible candidate. `NoEligibleSlot` is a normal outcome (e.g. both
    /// RB slots and FLEX already filled).
    pub fn assign(&mut self, player: Player) -> Result<SlotId, AssignError> {
        self.place(player, true)
    }

    /// Clear exactly one slot, returning the player that occupied it.
    pub fn unassign(&mut self, id: SlotId) -> Option<Player> {
        let player = self
            .slots
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| s.player.take());
        self.debug_check_invariant();
        player
    }

    /// Reset the session: empty every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.player = None;
        }
    }

    /// Map an optimizer result onto the slot structure.
    ///
    /// Positions are processed in the engine's own slot-priority order (QB,
    /// RB, WR, TE, DST), not the optimizer's, so placement is deterministic
    /// and reproducible. FLEX is resolved last: the used-player set at that
    /// point already includes everything consumed by the single-position
    /// passes, so a player is never placed twice. Excluded, duplicate, and
    /// unplaceable candidates are skipped with a warning.
    ///
    /// Returns the number of players placed.
    pub fn apply_lineup(&mut self, lineup: &OptimizedLineup) -> usize {
        let mut placed = 0;

        let passes: [(Position, &[Player]); 5] = [
            (Position::Quarterback, &lineup.qb),
            (Position::RunningBack, &lineup.rb),
            (Position::WideReceiver, &lineup.wr),
            (Position::TightEnd, &lineup.te),
            (Position::Defense, &lineup.dst),
        ];

        for (position, candidates) in passes {
            for candidate in candidates {
                match self.place(candidate.clone(), false) {
                    Ok(slot) => {
                        debug!(player = %candidate.player_id, %slot, "placed from optimizer list");
                        placed += 1;
                    }
                    // All single-position slots for this position are full;
                    // the rest of the ranked list is surplus.
                    Err(AssignError::NoEligibleSlot { .. }) => break,
                    Err(e) => {
                        warn!(position = %position, error = %e, "skipping optimizer candidate");
                    }
                }
            }
        }

        // FLEX pass, after every single-position slot has settled.
        for candidate in &lineup.flex {
            if !self.slot(SlotId::Flex).is_empty() {
                break;
            }
            match self.place_flex(candidate.clone()) {
                Ok(()) => {
                    debug!(player = %candidate.player_id, "placed FLEX from optimizer list");
                    placed += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping FLEX candidate");
                }
            }
        }

        placed
    }

    /// Core placement: scan single-position slots in schema order, then
    /// (optionally) FLEX for RB/WR/TE candidates.
    fn place(&mut self, player: Player, include_flex: bool) -> Result<SlotId, AssignError> {
        if player.excluded {
            return Err(AssignError::ExcludedPlayer {
                player_id: player.player_id.clone(),
            });
        }
        if self.has_player(&player.player_id) {
            return Err(AssignError::DuplicatePlayer {
                player_id: player.player_id.clone(),
            });
        }

        let position = player.position;

        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| !s.id.is_flex() && s.is_empty() && s.accepts(position))
        {
            let id = slot.id;
            slot.player = Some(player);
            self.debug_check_invariant();
            return Ok(id);
        }

        if include_flex && position.is_flex_eligible() {
            if let Some(slot) = self
                .slots
                .iter_mut()
                .find(|s| s.id.is_flex() && s.is_empty())
            {
                slot.player = Some(player);
                self.debug_check_invariant();
                return Ok(SlotId::Flex);
            }
        }

        Err(AssignError::NoEligibleSlot { position })
    }

    /// Place a candidate directly into the FLEX slot.
    fn place_flex(&mut self, player: Player) -> Result<(), AssignError> {
        if player.excluded {
            return Err(AssignError::ExcludedPlayer {
                player_id: player.player_id.clone(),
            });
        }
        if self.has_player(&player.player_id) {
            return Err(AssignError::DuplicatePlayer {
                player_id: player.player_id.clone(),
            });
        }
        if !player.position.is_flex_eligible() {
            return Err(AssignError::NoEligibleSlot {
                position: player.position,
            });
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id.is_flex() && s.is_empty())
            .ok_or(AssignError::NoEligibleSlot {
                position: player.position,
            })?;
        slot.player = Some(player);
        self.debug_check_invariant();
        Ok(())
    }

    /// Duplicate-player invariant: a player_id appears in at most one slot.
    /// Fatal in debug builds; must not occur in correct production code.
    fn debug_check_invariant(&self) {
        #[cfg(debug_assertions)]
        {
            let mut seen = std::collections::HashSet::new();
            for slot in &self.slots {
                if let Some(p) = &slot.player {
                    debug_assert!(
                        seen.insert(p.player_id.as_str()),
                        "player {} occupies more than one slot",
                        p.player_id
                    );
                }
            }
        }
    }
}
