//! Word Supply
//!
//! Client side of the external word-generation service.
//!
//! - `protocol`: request/response bodies
//! - `http`: `reqwest` transport
//! - `client`: batched fetch with de-duplication against an exclusion set

pub mod client;
pub mod http;
pub mod protocol;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

pub use client::WordSupplyClient;
pub use http::HttpWordSupply;
pub use protocol::{GenerateRequest, GenerateResponse};

/// Default word-generation endpoint.
pub const DEFAULT_SUPPLY_URL: &str = "https://getaiwords-2vgpkucjlq-uc.a.run.app";

/// One request/response exchange with a word source.
#[async_trait]
pub trait WordSupply: Send + Sync {
    /// Ask for one batch of candidate words.
    async fn generate_batch(&self, request: &GenerateRequest) -> Result<Vec<String>, SupplyError>;
}

/// Word supply errors. All of them are per-batch failures.
#[derive(Debug, thiserror::Error)]
pub enum SupplyError {
    /// Request never produced a response (connect, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("Server error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error text returned by the service.
        body: String,
    },

    /// Response body was not a word list.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Word supply configuration.
#[derive(Debug, Clone)]
pub struct SupplyConfig {
    /// Service URL (POST).
    pub endpoint: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Sequential batches per refresh.
    pub batch_count: usize,
    /// Words requested per batch.
    pub batch_size: usize,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SUPPLY_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            batch_count: 3,
            batch_size: 50,
        }
    }
}

impl SupplyConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("HEADSUP_SUPPLY_URL").unwrap_or(defaults.endpoint),
            request_timeout: env_number("HEADSUP_SUPPLY_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            batch_count: env_number("HEADSUP_BATCH_COUNT")
                .unwrap_or(defaults.batch_count),
            batch_size: env_number("HEADSUP_BATCH_SIZE")
                .unwrap_or(defaults.batch_size),
        }
    }
}

/// Read a numeric environment variable, warning about and ignoring values
/// that do not parse (including ones too large for `T`).
pub(crate) fn env_number<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", name, raw);
            None
        }
    }
}
