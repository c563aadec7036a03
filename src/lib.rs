//! Polls a market-data endpoint and renders commodity prices into an
//! injected render target.

pub mod config;
pub mod market_data;
pub mod metrics;
pub mod render;
pub mod widget;

pub use market_data::adapters::http::HttpMarketDataSource;
pub use market_data::source::{FetchError, MarketDataSource};
pub use market_data::types::{CommodityQuote, MarketDataSnapshot};
pub use widget::target::{FileTarget, RenderTarget, SharedBuffer};
pub use widget::{MarketDataWidget, RefreshOutcome, WidgetHandle, WidgetState};
