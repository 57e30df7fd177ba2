// Roster construction: the fixed slot schema, the assignment engine, and
// the derived cap ledger.

pub mod ledger;
pub mod slot;
pub mod state;
