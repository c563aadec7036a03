use async_trait::async_trait;
use thiserror::Error;

use super::types::MarketDataSnapshot;

/// Path of the market-data endpoint, relative to the host's base URL.
pub const MARKET_DATA_PATH: &str = "/api/market-data";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed market data: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Anything that can produce a fresh snapshot.
///
/// The widget only ever calls `fetch`; how the snapshot is obtained
/// (HTTP, fixture, in-process provider) is up to the implementation.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<MarketDataSnapshot, FetchError>;
}
