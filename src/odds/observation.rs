// Raw market-line observations and the in-memory store that holds them.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Markets
// ---------------------------------------------------------------------------

/// A statistical category a bookmaker offers a line on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    PassYards,
    RushYards,
    RecYards,
    Receptions,
    RushAttempts,
    AnytimeTd,
}

/// All markets the dashboard resolves, in display order.
pub const ALL_MARKETS: [Market; 6] = [
    Market::PassYards,
    Market::RushYards,
    Market::RecYards,
    Market::Receptions,
    Market::RushAttempts,
    Market::AnytimeTd,
];

/// Provider endpoint family a market is fetched from. Yardage/volume props
/// and touchdown scorer markets live on different upstream endpoints, so the
/// aggregator batches one call per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketGroup {
    Props,
    Touchdowns,
}

impl Market {
    /// The wire key used by the odds provider API.
    pub fn api_key(&self) -> &'static str {
        match self {
            Market::PassYards => "player_pass_yds",
            Market::RushYards => "player_rush_yds",
            Market::RecYards => "player_reception_yds",
            Market::Receptions => "player_receptions",
            Market::RushAttempts => "player_rush_attempts",
            Market::AnytimeTd => "player_anytime_td",
        }
    }

    /// Parse a wire key back into a Market.
    pub fn from_api_key(key: &str) -> Option<Self> {
        match key {
            "player_pass_yds" => Some(Market::PassYards),
            "player_rush_yds" => Some(Market::RushYards),
            "player_reception_yds" => Some(Market::RecYards),
            "player_receptions" => Some(Market::Receptions),
            "player_rush_attempts" => Some(Market::RushAttempts),
            "player_anytime_td" => Some(Market::AnytimeTd),
            _ => None,
        }
    }

    /// The canonical threshold for this market, if it has one.
    ///
    /// "N+ touchdown" markets are quoted at 0.5; yardage, attempts, and
    /// reception lines float freely and have no canonical point.
    pub fn threshold(&self) -> Option<f64> {
        match self {
            Market::AnytimeTd => Some(0.5),
            _ => None,
        }
    }

    /// Which provider endpoint family this market belongs to.
    pub fn group(&self) -> MarketGroup {
        match self {
            Market::AnytimeTd => MarketGroup::Touchdowns,
            _ => MarketGroup::Props,
        }
    }

    /// Human-readable label for table headers.
    pub fn label(&self) -> &'static str {
        match self {
            Market::PassYards => "Pass Yds",
            Market::RushYards => "Rush Yds",
            Market::RecYards => "Rec Yds",
            Market::Receptions => "Rec",
            Market::RushAttempts => "Rush Att",
            Market::AnytimeTd => "Anytime TD",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_key())
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// The side of a line an observation quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Over,
    Under,
}

/// One bookmaker's quote for one (player, market, outcome), as received.
///
/// Immutable once received. Multiple observations may exist for the same
/// (player, market) from different bookmakers or at different times, and no
/// two are assumed consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineObservation {
    pub player_id: String,
    pub market: Market,
    pub bookmaker: String,
    pub outcome: Outcome,
    pub point: Option<f64>,
    pub price: Option<f64>,
    pub probability: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Observation store
// ---------------------------------------------------------------------------

/// Store key: the newest observation per (player, market, bookmaker, outcome)
/// is authoritative.
type ObsKey = (String, Market, String, Outcome);

/// In-memory collection of raw line observations for one (week, player-set)
/// batch. Replaced wholesale when a new batch is fetched; never merged
/// across weeks.
#[derive(Debug, Default)]
pub struct ObservationStore {
    by_key: HashMap<ObsKey, LineObservation>,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an observation. If one already exists for the same
    /// (player, market, bookmaker, outcome), the latest `observed_at` wins.
    pub fn insert(&mut self, obs: LineObservation) {
        let key = (
            obs.player_id.clone(),
            obs.market,
            obs.bookmaker.clone(),
            obs.outcome,
        );
        match self.by_key.get(&key) {
            Some(existing) if existing.observed_at > obs.observed_at => {}
            _ => {
                self.by_key.insert(key, obs);
            }
        }
    }

    /// Insert a batch of observations.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = LineObservation>) {
        for obs in batch {
            self.insert(obs);
        }
    }

    /// All stored observations for one (player, market) pair, in no
    /// particular order.
    pub fn observations_for(&self, player_id: &str, market: Market) -> Vec<&LineObservation> {
        self.by_key
            .values()
            .filter(|o| o.player_id == player_id && o.market == market)
            .collect()
    }

    /// Total number of stored observations.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
