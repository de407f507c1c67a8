use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling interval tag carried by every feed record.
///
/// The upstream feed mixes several bucket sizes in one array; the dashboard
/// works on exactly one of them (configured, default 10-minute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "10_min")]
    TenMin,
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "4_hours")]
    FourHours,
    #[serde(rename = "daily")]
    Daily,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::TenMin => "10_min",
            Granularity::Hourly => "hourly",
            Granularity::FourHours => "4_hours",
            Granularity::Daily => "daily",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated record from the fee feed.
///
/// `chain` starts out as the raw `origin_key` and is rewritten to the
/// canonical display name by [`crate::chains::normalize`]. `metric_key`
/// stays a free-form string so records for metrics outside the snapshot
/// schema survive in the stream; the pivot enumerates the keys it knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub chain: String,
    pub metric_key: String,
    pub granularity: Granularity,
    /// Epoch milliseconds, as delivered by the feed's `unix` field.
    pub unix_ms: i64,
    pub value: Option<f64>,
}

/// The fixed set of fee metrics that form the snapshot columns.
///
/// Metric keys outside this set never create columns; the pivot ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKey {
    AvgCostUsd,
    MedianCostUsd,
    NativeMedianCostUsd,
}

impl MetricKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "txcosts_avg_usd" => Some(MetricKey::AvgCostUsd),
            "txcosts_median_usd" => Some(MetricKey::MedianCostUsd),
            "txcosts_native_median_usd" => Some(MetricKey::NativeMedianCostUsd),
            _ => None,
        }
    }

    pub const fn key(&self) -> &'static str {
        match self {
            MetricKey::AvgCostUsd => "txcosts_avg_usd",
            MetricKey::MedianCostUsd => "txcosts_median_usd",
            MetricKey::NativeMedianCostUsd => "txcosts_native_median_usd",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_serde_round_trip() {
        let g: Granularity = serde_json::from_str("\"10_min\"").unwrap();
        assert_eq!(g, Granularity::TenMin);
        assert_eq!(serde_json::to_string(&g).unwrap(), "\"10_min\"");
    }

    #[test]
    fn test_granularity_rejects_unknown_tag() {
        let res: Result<Granularity, _> = serde_json::from_str("\"weekly\"");
        assert!(res.is_err());
    }

    #[test]
    fn test_metric_key_lookup() {
        assert_eq!(
            MetricKey::from_key("txcosts_median_usd"),
            Some(MetricKey::MedianCostUsd)
        );
        assert_eq!(MetricKey::from_key("txcount"), None);
        assert_eq!(MetricKey::AvgCostUsd.key(), "txcosts_avg_usd");
    }
}
