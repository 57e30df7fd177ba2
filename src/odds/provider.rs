// HTTP implementation of the odds provider, speaking the provider's
// batched board endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::upstream::ProviderError;

use super::aggregate::OddsProvider;
use super::observation::{LineObservation, Market, Outcome};

/// HTTP client for the odds provider API.
///
/// The board endpoint accepts the full player set and market set in one
/// request, which is what lets the aggregator stay at a constant number of
/// round trips.
pub struct OddsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OddsApiClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// One observation as the provider serializes it. Unknown markets and
/// outcomes are dropped rather than failing the whole batch.
#[derive(Debug, Deserialize)]
struct WireObservation {
    player_id: String,
    market: String,
    bookmaker: String,
    outcome: String,
    point: Option<f64>,
    price: Option<f64>,
    probability: Option<f64>,
    observed_at: DateTime<Utc>,
}

impl WireObservation {
    fn into_observation(self) -> Option<LineObservation> {
        let market = Market::from_api_key(&self.market)?;
        let outcome = match self.outcome.as_str() {
            "Over" => Outcome::Over,
            "Under" => Outcome::Under,
            _ => return None,
        };
        Some(LineObservation {
            player_id: self.player_id,
            market,
            bookmaker: self.bookmaker,
            outcome,
            point: self.point,
            price: self.price,
            probability: self.probability,
            observed_at: self.observed_at,
        })
    }
}

#[async_trait]
impl OddsProvider for OddsApiClient {
    async fn fetch_observations(
        &self,
        week: u16,
        player_ids: &[String],
        markets: &[Market],
    ) -> Result<Vec<LineObservation>, ProviderError> {
        let market_keys: Vec<&str> = markets.iter().map(|m| m.api_key()).collect();

        let mut request = self
            .http
            .get(format!("{}/v1/board", self.base_url))
            .query(&[
                ("week", week.to_string()),
                ("players", player_ids.join(",")),
                ("markets", market_keys.join(",")),
            ]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apiKey", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let wire: Vec<WireObservation> =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Decode {
                    message: e.to_string(),
                })?;

        let total = wire.len();
        let observations: Vec<LineObservation> = wire
            .into_iter()
            .filter_map(WireObservation::into_observation)
            .collect();
        if observations.len() < total {
            debug!(
                dropped = total - observations.len(),
                "dropped observations with unknown market or outcome"
            );
        }

        Ok(observations)
    }
}
