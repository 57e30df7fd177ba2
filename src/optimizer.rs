// Optimization service client. The service runs the combinatorial search
// under its own salary/stacking model; this side only consumes its ranked
// candidate lists and maps them onto slots deterministically.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::Player;
use crate::upstream::ProviderError;

/// Ranked candidate lists per slot group, best candidate first. The lists
/// may overlap (a FLEX candidate can also headline the RB list); the
/// assignment engine resolves overlaps, not the optimizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizedLineup {
    #[serde(default)]
    pub qb: Vec<Player>,
    #[serde(default)]
    pub rb: Vec<Player>,
    #[serde(default)]
    pub wr: Vec<Player>,
    #[serde(default)]
    pub te: Vec<Player>,
    #[serde(default)]
    pub flex: Vec<Player>,
    #[serde(default)]
    pub dst: Vec<Player>,
}

impl OptimizedLineup {
    /// Total number of candidates across all lists.
    pub fn candidate_count(&self) -> usize {
        self.qb.len()
            + self.rb.len()
            + self.wr.len()
            + self.te.len()
            + self.flex.len()
            + self.dst.len()
    }
}

/// HTTP client for the optimization service.
pub struct OptimizerClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct OptimizeRequest {
    week: u16,
    salary_cap: u32,
}

impl OptimizerClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Request an optimized candidate set for the week.
    pub async fn optimize(
        &self,
        week: u16,
        salary_cap: u32,
    ) -> Result<OptimizedLineup, ProviderError> {
        let response = self
            .http
            .post(format!("{}/v1/optimize", self.base_url))
            .json(&OptimizeRequest { week, salary_cap })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        let lineup: OptimizedLineup =
            response.json().await.map_err(|e| ProviderError::Decode {
                message: e.to_string(),
            })?;

        debug!(
            week,
            candidates = lineup.candidate_count(),
            "optimizer result received"
        );
        Ok(lineup)
    }
}
