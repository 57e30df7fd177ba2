// Shared error type for the upstream HTTP clients (odds provider, player
// pool, optimization service).

use thiserror::Error;

/// Failure talking to an upstream API. Always isolated to the affected
/// batch: callers degrade the affected entries to "absent" rather than
/// propagating a hard failure into roster construction.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("failed to decode upstream response: {message}")]
    Decode { message: String },

    #[error("upstream request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}
