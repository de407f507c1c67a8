//! Long-to-wide reshaping of the sample stream into the latest snapshot.
//!
//! Many long-format records per chain become one wide row holding the fixed
//! set of fee metrics as columns, keyed to the chain's most recent bucket.

use chrono::DateTime;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use crate::models::{Granularity, MetricKey, MetricSample, SnapshotRow};

/// Metric values collected for one (chain, timestamp) bucket.
///
/// Each column records whether a sample was seen at all, so the first sample
/// per metric wins when the feed violates its uniqueness contract and sends
/// duplicates. That first-in-input-order rule is the canonical tie-break.
#[derive(Debug, Default, Clone)]
struct PivotGroup {
    avg: Option<Option<f64>>,
    median: Option<Option<f64>>,
    native_median: Option<Option<f64>>,
}

impl PivotGroup {
    fn record(&mut self, key: MetricKey, value: Option<f64>) {
        let slot = match key {
            MetricKey::AvgCostUsd => &mut self.avg,
            MetricKey::MedianCostUsd => &mut self.median,
            MetricKey::NativeMedianCostUsd => &mut self.native_median,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

/// Build the latest snapshot: one row per chain present in the input after
/// filtering to `granularity`.
///
/// Samples are grouped by (chain, timestamp) and pivoted on the known metric
/// keys; unknown metric keys never create columns. Per chain the group with
/// the maximum timestamp wins, a bucket missing a metric yields `None` for
/// that column, and the result is sorted ascending by average cost with
/// missing averages last (ties broken by chain name). Empty input yields an
/// empty snapshot, never an error.
pub fn latest_snapshot(samples: &[MetricSample], granularity: Granularity) -> Vec<SnapshotRow> {
    let mut groups: FxHashMap<&str, FxHashMap<i64, PivotGroup>> = FxHashMap::default();

    for sample in samples {
        if sample.granularity != granularity {
            continue;
        }
        let bucket = groups
            .entry(sample.chain.as_str())
            .or_default()
            .entry(sample.unix_ms)
            .or_default();
        // Unknown metric keys count toward the bucket (and so toward
        // last_updated) but never populate a column.
        if let Some(key) = MetricKey::from_key(&sample.metric_key) {
            bucket.record(key, sample.value);
        }
    }

    let mut rows: Vec<SnapshotRow> = groups
        .into_iter()
        .filter_map(|(chain, buckets)| {
            let (ts, group) = buckets.into_iter().max_by_key(|(ts, _)| *ts)?;
            Some(SnapshotRow {
                chain: chain.to_string(),
                avg_cost_usd: group.avg.flatten(),
                median_cost_usd: group.median.flatten(),
                native_median_cost_usd: group.native_median.flatten(),
                last_updated: DateTime::from_timestamp_millis(ts).unwrap_or_default(),
            })
        })
        .collect();

    rows.sort_by(|a, b| match (a.avg_cost_usd, b.avg_cost_usd) {
        (Some(x), Some(y)) => x
            .partial_cmp(&y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.chain.cmp(&b.chain)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.chain.cmp(&b.chain),
    });

    rows
}
