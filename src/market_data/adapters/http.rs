use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::market_data::source::{FetchError, MarketDataSource, MARKET_DATA_PATH};
use crate::market_data::types::MarketDataSnapshot;

/// Polls `GET {base_url}/api/market-data` over HTTP.
#[derive(Clone, Debug)]
pub struct HttpMarketDataSource {
    client: Client,
    url: String,
}

impl HttpMarketDataSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), MARKET_DATA_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MarketDataSource for HttpMarketDataSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self) -> Result<MarketDataSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(url = %self.url, status = status.as_u16(), "market data response");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Read the body first so a bad payload is reported as Decode, not Transport
        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        Ok(serde_json::from_slice(&body)?)
    }
}
