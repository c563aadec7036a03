use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus HTTP exporter on the given port.
/// After this call, any metrics recorded via the `metrics` crate
/// macros (counter!, histogram!) are automatically exported at /metrics.
pub fn init_metrics_server(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;
    Ok(())
}

// ── Widget metrics ───────────────────────────────────────────────

pub fn record_refresh(outcome: &'static str) {
    counter!("market_data_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_fetch_latency(source: &'static str, latency_ms: f64) {
    histogram!("market_data_fetch_latency_ms", "source" => source).record(latency_ms);
}
