// Batch aggregation: resolve an entire roster's markets in a constant
// number of provider round trips.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::upstream::ProviderError;

use super::observation::{LineObservation, Market, MarketGroup, ObservationStore};
use super::resolve::{resolve, BookPreference, ResolvedLine};

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Source of raw line observations. The request shape is multi-player and
/// multi-market by contract so implementations can batch a whole roster's
/// markets into one upstream call.
#[async_trait]
pub trait OddsProvider: Send + Sync {
    async fn fetch_observations(
        &self,
        week: u16,
        player_ids: &[String],
        markets: &[Market],
    ) -> Result<Vec<LineObservation>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Odds board
// ---------------------------------------------------------------------------

/// Nested lookup table `player_id -> market -> resolved line`, the pure
/// value the aggregator hands to callers. Missing entries mean "no data"
/// and must never be rendered as zero.
#[derive(Debug, Default)]
pub struct OddsBoard {
    lines: HashMap<String, HashMap<Market, ResolvedLine>>,
}

impl OddsBoard {
    /// Look up the resolved line for one (player, market) pair.
    pub fn get(&self, player_id: &str, market: Market) -> Option<&ResolvedLine> {
        self.lines.get(player_id)?.get(&market)
    }

    /// All resolved markets for one player.
    pub fn player(&self, player_id: &str) -> Option<&HashMap<Market, ResolvedLine>> {
        self.lines.get(player_id)
    }

    /// Total number of resolved lines on the board.
    pub fn len(&self) -> usize {
        self.lines.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn insert(&mut self, line: ResolvedLine) {
        self.lines
            .entry(line.player_id.clone())
            .or_default()
            .insert(line.market, line);
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Orchestrates resolution across a full player set and market set.
///
/// Markets are grouped by provider endpoint family and each non-empty group
/// costs exactly one provider call, regardless of how many players are in
/// scope. A per-group timeout and failure isolation keep one bad batch from
/// poisoning the rest of the board.
pub struct BatchAggregator<P> {
    provider: P,
    prefs: BookPreference,
    timeout: Duration,
}

impl<P: OddsProvider> BatchAggregator<P> {
    pub fn new(provider: P, prefs: BookPreference, timeout: Duration) -> Self {
        Self {
            provider,
            prefs,
            timeout,
        }
    }

    /// Fetch and resolve lines for every (player, market) pair in scope.
    ///
    /// The `week` scope is an explicit parameter; nothing here depends on
    /// ambient session state. Failed or timed-out groups degrade to absent
    /// entries for their markets and are logged, never propagated.
    pub async fn aggregate(
        &self,
        week: u16,
        player_ids: &[String],
        markets: &[Market],
    ) -> OddsBoard {
        let groups = group_markets(markets);

        // One call per endpoint group, all in flight together.
        let fetches = groups.iter().map(|(group, group_markets)| async move {
            let result = tokio::time::timeout(
                self.timeout,
                self.provider.fetch_observations(week, player_ids, group_markets),
            )
            .await;
            (*group, result)
        });

        let mut store = ObservationStore::new();
        for (group, result) in join_all(fetches).await {
            match result {
                Ok(Ok(batch)) => {
                    debug!(?group, observations = batch.len(), "batch fetched");
                    store.extend(batch);
                }
                Ok(Err(e)) => {
                    warn!(?group, error = %e, "odds batch failed; entries degrade to absent");
                }
                Err(_) => {
                    let e = ProviderError::Timeout {
                        seconds: self.timeout.as_secs(),
                    };
                    warn!(?group, error = %e, "odds batch timed out; entries degrade to absent");
                }
            }
        }

        let mut board = OddsBoard::default();
        for player_id in player_ids {
            for &market in markets {
                let observations = store.observations_for(player_id, market);
                if let Some(line) = resolve(&observations, market, &self.prefs) {
                    board.insert(line);
                }
            }
        }

        debug!(
            players = player_ids.len(),
            markets = markets.len(),
            resolved = board.len(),
            "odds board assembled"
        );
        board
    }
}

/// Partition markets by endpoint group, preserving request order within
/// each group.
fn group_markets(markets: &[Market]) -> Vec<(MarketGroup, Vec<Market>)> {
    let mut groups: Vec<(MarketGroup, Vec<Market>)> = Vec::new();
    for &market in markets {
        match groups.iter_mut().find(|(g, _)| *g == market.group()) {
            Some((_, list)) => list.push(market),
            None => groups.push((market.group(), vec![market])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::observation::{Outcome, ALL_MARKETS};
    use crate::odds::resolve::SourceRank;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn prefs() -> BookPreference {
        BookPreference {
            preferred: "bookA".to_string(),
            fallback: "bookB".to_string(),
        }
    }

    fn over(player: &str, market: Market, book: &str, point: f64) -> LineObservation {
        LineObservation {
            player_id: player.to_string(),
            market,
            bookmaker: book.to_string(),
            outcome: Outcome::Over,
            point: Some(point),
            price: Some(-110.0),
            probability: Some(0.52),
            observed_at: Utc.timestamp_opt(1_000, 0).unwrap(),
        }
    }

    /// Mock provider that counts outbound calls and serves a canned board.
    struct CountingProvider {
        calls: AtomicUsize,
        fail_group: Option<MarketGroup>,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_group: None,
            }
        }

        fn failing(group: MarketGroup) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_group: Some(group),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OddsProvider for CountingProvider {
        async fn fetch_observations(
            &self,
            _week: u16,
            player_ids: &[String],
            markets: &[Market],
        ) -> Result<Vec<LineObservation>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(fail) = self.fail_group {
                if markets.iter().any(|m| m.group() == fail) {
                    return Err(ProviderError::Status { status: 502 });
                }
            }

            let mut batch = Vec::new();
            for player in player_ids {
                for &market in markets {
                    let point = market.threshold().unwrap_or(42.5);
                    batch.push(over(player, market, "bookA", point));
                }
            }
            Ok(batch)
        }
    }

    /// Provider that never responds within any reasonable timeout.
    struct StalledProvider;

    #[async_trait]
    impl OddsProvider for StalledProvider {
        async fn fetch_observations(
            &self,
            _week: u16,
            _player_ids: &[String],
            _markets: &[Market],
        ) -> Result<Vec<LineObservation>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
            Ok(vec![])
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{i}")).collect()
    }

    #[tokio::test]
    async fn one_call_per_market_group_not_per_pair() {
        let aggregator = BatchAggregator::new(
            CountingProvider::new(),
            prefs(),
            Duration::from_secs(5),
        );

        // 40 players x 6 markets would be 240 calls for a naive N+1
        // implementation; the contract is one call per endpoint group.
        let players = ids(40);
        let board = aggregator.aggregate(12, &players, &ALL_MARKETS).await;

        assert_eq!(
            aggregator.provider.call_count(),
            2,
            "expected exactly one call for props and one for touchdowns"
        );
        assert_eq!(board.len(), 40 * ALL_MARKETS.len());
    }

    #[tokio::test]
    async fn props_only_request_is_one_call() {
        let aggregator = BatchAggregator::new(
            CountingProvider::new(),
            prefs(),
            Duration::from_secs(5),
        );

        let players = ids(10);
        let markets = [Market::PassYards, Market::RushYards, Market::Receptions];
        aggregator.aggregate(3, &players, &markets).await;

        assert_eq!(aggregator.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_group_degrades_to_absent_without_poisoning_others() {
        let aggregator = BatchAggregator::new(
            CountingProvider::failing(MarketGroup::Touchdowns),
            prefs(),
            Duration::from_secs(5),
        );

        let players = ids(3);
        let board = aggregator.aggregate(7, &players, &ALL_MARKETS).await;

        // Touchdown entries absent, yardage entries intact.
        assert!(board.get("p0", Market::AnytimeTd).is_none());
        assert!(board.get("p0", Market::PassYards).is_some());
        assert!(board.get("p2", Market::Receptions).is_some());
        assert_eq!(board.len(), 3 * (ALL_MARKETS.len() - 1));
    }

    #[tokio::test]
    async fn timed_out_provider_yields_empty_board() {
        let aggregator = BatchAggregator::new(
            StalledProvider,
            prefs(),
            Duration::from_millis(50),
        );

        let players = ids(2);
        let board = aggregator.aggregate(1, &players, &ALL_MARKETS).await;

        assert!(board.is_empty(), "timeout must degrade to absent, not hang");
        assert!(board.get("p0", Market::PassYards).is_none());
    }

    #[tokio::test]
    async fn aggregate_resolves_through_the_cascade() {
        let aggregator = BatchAggregator::new(
            CountingProvider::new(),
            prefs(),
            Duration::from_secs(5),
        );

        let players = ids(1);
        let board = aggregator.aggregate(1, &players, &[Market::AnytimeTd]).await;

        let line = board.get("p0", Market::AnytimeTd).expect("line resolved");
        assert_eq!(line.point, 0.5);
        assert_eq!(line.bookmaker, "bookA");
        assert_eq!(line.source_rank, SourceRank::PreferredExact);
    }

    #[tokio::test]
    async fn empty_player_set_is_a_noop_board() {
        let aggregator = BatchAggregator::new(
            CountingProvider::new(),
            prefs(),
            Duration::from_secs(5),
        );

        let board = aggregator.aggregate(1, &[], &ALL_MARKETS).await;
        assert!(board.is_empty());
    }

    #[test]
    fn group_markets_preserves_order_within_groups() {
        let groups = group_markets(&ALL_MARKETS);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, MarketGroup::Props);
        assert_eq!(
            groups[0].1,
            vec![
                Market::PassYards,
                Market::RushYards,
                Market::RecYards,
                Market::Receptions,
                Market::RushAttempts,
            ]
        );
        assert_eq!(groups[1].0, MarketGroup::Touchdowns);
        assert_eq!(groups[1].1, vec![Market::AnytimeTd]);
    }
}
