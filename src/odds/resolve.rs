// Preference resolution: pick one authoritative line per (player, market)
// out of competing, possibly-contradictory bookmaker observations.

use serde::{Deserialize, Serialize};

use super::observation::{LineObservation, Market, Outcome};

// ---------------------------------------------------------------------------
// Book preferences
// ---------------------------------------------------------------------------

/// The bookmaker preference order the cascade consults. Comes from
/// providers.toml so the preferred/fallback pair is never hard-coded at
/// call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPreference {
    pub preferred: String,
    pub fallback: String,
}

/// Which role a cascade tier draws its bookmaker from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BookRole {
    Preferred,
    Fallback,
}

impl BookPreference {
    fn book_for(&self, role: BookRole) -> &str {
        match role {
            BookRole::Preferred => &self.preferred,
            BookRole::Fallback => &self.fallback,
        }
    }
}

// ---------------------------------------------------------------------------
// Cascade tiers
// ---------------------------------------------------------------------------

/// Which cascade tier produced a resolved line. Recorded on the result for
/// auditability; tests assert tier precedence through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceRank {
    /// Preferred book, point exactly at the market's canonical threshold.
    PreferredExact,
    /// Preferred book, any point.
    PreferredAny,
    /// Fallback book, point exactly at the market's canonical threshold.
    FallbackExact,
    /// Fallback book, any point.
    FallbackAny,
}

impl SourceRank {
    /// 1-based tier number, matching the cascade evaluation order.
    pub fn tier(&self) -> u8 {
        match self {
            SourceRank::PreferredExact => 1,
            SourceRank::PreferredAny => 2,
            SourceRank::FallbackExact => 3,
            SourceRank::FallbackAny => 4,
        }
    }
}

/// One predicate/selector entry of the fallback cascade.
struct Tier {
    rank: SourceRank,
    role: BookRole,
    exact_threshold: bool,
}

/// The full cascade, evaluated in order, first match wins. Expressed as a
/// table rather than nested branching so each tier is testable on its own.
const CASCADE: [Tier; 4] = [
    Tier {
        rank: SourceRank::PreferredExact,
        role: BookRole::Preferred,
        exact_threshold: true,
    },
    Tier {
        rank: SourceRank::PreferredAny,
        role: BookRole::Preferred,
        exact_threshold: false,
    },
    Tier {
        rank: SourceRank::FallbackExact,
        role: BookRole::Fallback,
        exact_threshold: true,
    },
    Tier {
        rank: SourceRank::FallbackAny,
        role: BookRole::Fallback,
        exact_threshold: false,
    },
];

// ---------------------------------------------------------------------------
// Resolved lines
// ---------------------------------------------------------------------------

/// The single line chosen for a (player, market) pair.
///
/// `point` is always present (resolution requires it); `price` and
/// `probability` may be independently absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLine {
    pub player_id: String,
    pub market: Market,
    pub point: f64,
    pub price: Option<f64>,
    pub probability: Option<f64>,
    pub bookmaker: String,
    pub source_rank: SourceRank,
}

/// Resolve one (player, market) pair's observations to at most one line.
///
/// Cascade, first match wins:
/// 1. preferred book, "Over", point at the market's canonical threshold
/// 2. preferred book, "Over", any point
/// 3. fallback book, "Over", threshold-exact
/// 4. fallback book, "Over", any point
/// 5. `None` — callers must render this as "no data", never as zero.
///
/// Markets without a canonical threshold (yardage, attempts, receptions)
/// skip the exact tiers. A match requires a non-null `point`; ties within a
/// tier go to the latest `observed_at`.
pub fn resolve(
    observations: &[&LineObservation],
    market: Market,
    prefs: &BookPreference,
) -> Option<ResolvedLine> {
    let threshold = market.threshold();

    for tier in &CASCADE {
        // Exact tiers are meaningless for markets without a threshold.
        if tier.exact_threshold && threshold.is_none() {
            continue;
        }
        let book = prefs.book_for(tier.role);

        let winner = observations
            .iter()
            .filter(|o| o.market == market && o.outcome == Outcome::Over)
            .filter(|o| o.bookmaker == book)
            .filter(|o| match (tier.exact_threshold, o.point, threshold) {
                (true, Some(p), Some(t)) => p == t,
                (true, _, _) => false,
                (false, Some(_), _) => true,
                (false, None, _) => false,
            })
            .max_by_key(|o| o.observed_at);

        if let Some(obs) = winner {
            // The filter above guarantees point is present.
            let point = obs.point?;
            return Some(ResolvedLine {
                player_id: obs.player_id.clone(),
                market,
                point,
                price: obs.price,
                probability: obs.probability,
                bookmaker: obs.bookmaker.clone(),
                source_rank: tier.rank,
            });
        }
    }

    None
}
