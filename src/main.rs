use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use market_data_widget::config::Config;
use market_data_widget::metrics::prometheus;
use market_data_widget::{FileTarget, HttpMarketDataSource, MarketDataWidget};

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    if let Some(port) = config.metrics_port {
        prometheus::init_metrics_server(port)?;
        info!(port, "prometheus exporter listening");
    }

    let source = HttpMarketDataSource::new(&config.base_url, config.request_timeout)?;
    let target = FileTarget::new(&config.output_path);
    info!(
        url = source.url(),
        output = %target.path().display(),
        "market-data-widget starting"
    );

    let widget = MarketDataWidget::new(Arc::new(source), Some(Arc::new(target)))
        .with_refresh_interval(config.refresh_interval);
    if !widget.initialize() {
        warn!("nothing to render into, exiting");
        return Ok(());
    }

    let handle = widget.start();

    tokio::signal::ctrl_c().await?;
    info!("received Ctrl-C, shutting down");
    handle.stop();

    Ok(())
}
