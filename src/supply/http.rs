//! HTTP Word Supply
//!
//! POSTs a [`GenerateRequest`] as JSON and expects `{"words": [...]}` back.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{GenerateRequest, GenerateResponse, SupplyConfig, SupplyError, WordSupply};

/// Word source backed by the remote generation endpoint.
#[derive(Debug, Clone)]
pub struct HttpWordSupply {
    client: Client,
    endpoint: String,
}

impl HttpWordSupply {
    /// Build a client for `config.endpoint` with the configured timeout.
    pub fn new(config: &SupplyConfig) -> Result<Self, SupplyError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WordSupply for HttpWordSupply {
    #[instrument(skip(self, request), fields(category = %request.category, count = request.count))]
    async fn generate_batch(&self, request: &GenerateRequest) -> Result<Vec<String>, SupplyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SupplyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed = GenerateResponse::from_json(&body)
            .map_err(|e| SupplyError::Malformed(e.to_string()))?;
        debug!("Received {} candidate words", parsed.words.len());
        Ok(parsed.words)
    }
}
