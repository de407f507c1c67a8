use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::models::Granularity;

/// Upstream fee feed configuration.
///
/// The feed is a single unauthenticated GET returning the full working set;
/// the timeout is enforced client-side since the source has none.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.growthepie.xyz/v1/fees_dict.json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Dashboard shaping configuration.
///
/// Controls which slice of the feed the snapshot is built from and how the
/// cached result ages out.
#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    /// Sampling interval the dashboard works on.
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,
    /// Maximum age of the cached result before a refresh is required.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Decimal digits in formatted currency strings.
    #[serde(default = "default_precision")]
    pub precision: usize,
    /// Metric key the sparkline series is built from.
    #[serde(default = "default_series_metric")]
    pub series_metric: String,
    /// Cadence of the binary's poll loop.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_granularity() -> Granularity {
    Granularity::TenMin
}

fn default_ttl_seconds() -> u64 {
    300
}

fn default_precision() -> usize {
    3
}

fn default_series_metric() -> String {
    "txcosts_median_usd".to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            granularity: default_granularity(),
            ttl_seconds: default_ttl_seconds(),
            precision: default_precision(),
            series_metric: default_series_metric(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup when present; every field has a
/// default, so the binary also runs without one.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
