use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::MetricSample;

/// Latest fee figures for one chain, numeric form.
///
/// One row per chain present in the filtered input. Cost fields are `None`
/// when the chain's most recent bucket carried no sample for that metric;
/// `last_updated` is the maximum timestamp among the chain's samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub chain: String,
    pub avg_cost_usd: Option<f64>,
    pub median_cost_usd: Option<f64>,
    pub native_median_cost_usd: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

/// One table row as the presentation layer consumes it.
///
/// Costs are pre-formatted currency strings (missing values render as the
/// `-` placeholder) and the chain's sparkline series rides along.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub chain: String,
    pub avg_cost: String,
    pub median_cost: String,
    pub native_median_cost: String,
    pub last_updated: DateTime<Utc>,
    pub series: Vec<f64>,
}

/// Everything one refresh produces, in the three shapes presentation needs:
/// joined table rows, the chain-to-series mapping, and the raw normalized
/// sample stream for the full line chart.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub rows: Vec<DashboardRow>,
    pub series: FxHashMap<String, Vec<f64>>,
    pub samples: Vec<MetricSample>,
    pub fetched_at: DateTime<Utc>,
    /// Malformed feed records dropped during validation.
    pub skipped_rows: usize,
}
