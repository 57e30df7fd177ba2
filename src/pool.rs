// Player Pool API client: the weekly slate of players with salaries,
// projections, and pool flags.

use serde::Deserialize;
use tracing::debug;

use crate::player::{Player, Position};
use crate::upstream::ProviderError;

/// HTTP client for the player pool API.
pub struct PlayerPoolClient {
    http: reqwest::Client,
    base_url: String,
}

/// One pool entry as the API serializes it. Position comes over the wire
/// as a string; entries with unknown positions are dropped rather than
/// failing the week.
#[derive(Debug, Deserialize)]
struct WirePlayer {
    player_id: String,
    name: String,
    position: String,
    team: String,
    salary: u32,
    projected_points: f64,
    #[serde(default)]
    excluded: bool,
    tier: u8,
}

impl WirePlayer {
    fn into_player(self) -> Option<Player> {
        let position = Position::from_str_pos(&self.position)?;
        Some(Player {
            player_id: self.player_id,
            name: self.name,
            position,
            team: self.team,
            salary: self.salary,
            projected_points: self.projected_points,
            excluded: self.excluded,
            tier: self.tier,
        })
    }
}

impl PlayerPoolClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the full player pool for one week.
    pub async fn fetch_week(&self, week: u16) -> Result<Vec<Player>, ProviderError> {
        let response = self
            .http
            .get(format!("{}/v1/players", self.base_url))
            .query(&[("week", week.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let wire: Vec<WirePlayer> = response.json().await.map_err(|e| ProviderError::Decode {
            message: e.to_string(),
        })?;

        let total = wire.len();
        let players: Vec<Player> = wire.into_iter().filter_map(WirePlayer::into_player).collect();
        if players.len() < total {
            debug!(
                dropped = total - players.len(),
                "dropped pool entries with unknown position"
            );
        }

        Ok(players)
    }
}

/// Filter a pool down to players eligible for assignment and candidate
/// ranking (`excluded` entries removed).
pub fn usable_players(pool: &[Player]) -> Vec<&Player> {
    pool.iter().filter(|p| !p.excluded).collect()
}
