// Derived salary-cap totals, recomputed from the slot collection on every
// read. There is deliberately no other way to produce these numbers.

use serde::{Deserialize, Serialize};

use super::state::RosterState;

/// Snapshot of the cap ledger for the current slot assignments.
///
/// Over-cap and incomplete rosters are non-fatal warnings for the caller:
/// they block only the finalize action, not data entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapSummary {
    pub total_salary: u32,
    pub total_projected_points: f64,
    pub is_complete: bool,
    pub is_over_cap: bool,
}

impl RosterState {
    /// Recompute the cap ledger from the current slot assignments.
    pub fn summary(&self, cap: u32) -> CapSummary {
        let mut total_salary = 0u32;
        let mut total_projected_points = 0f64;
        let mut is_complete = true;

        for slot in self.slots() {
            match &slot.player {
                Some(p) => {
                    total_salary += p.salary;
                    total_projected_points += p.projected_points;
                }
                None => is_complete = false,
            }
        }

        CapSummary {
            total_salary,
            total_projected_points,
            is_complete,
            is_over_cap: total_salary > cap,
        }
    }
}
