use anyhow::{Context, bail};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_REFRESH_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_OUTPUT: &str = "market-data.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub base_url: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub output_path: PathBuf,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let base_url = lookup("MARKET_DATA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("MARKET_DATA_BASE_URL must be an http(s) URL, got {base_url:?}");
        }

        let refresh_secs = parse_or(&lookup, "MARKET_DATA_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;
        let timeout_secs = parse_or(&lookup, "MARKET_DATA_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if refresh_secs == 0 {
            bail!("MARKET_DATA_REFRESH_SECS must be greater than zero");
        }
        if timeout_secs == 0 {
            bail!("MARKET_DATA_TIMEOUT_SECS must be greater than zero");
        }

        let output_path = lookup("MARKET_DATA_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let metrics_port = lookup("METRICS_PORT")
            .map(|raw| raw.trim().parse::<u16>().with_context(|| format!("invalid METRICS_PORT {raw:?}")))
            .transpose()?;

        Ok(Self {
            log_level,
            base_url,
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            output_path,
            metrics_port,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key} {raw:?}")),
        None => Ok(default),
    }
}
