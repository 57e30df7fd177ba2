// Odds-line resolution: raw observations in, one authoritative line per
// (player, market) out, plus the composite key tables sort by.

pub mod aggregate;
pub mod observation;
pub mod provider;
pub mod resolve;
pub mod sort_key;
