//! Per-chain ordered value series for sparkline rendering.

use rustc_hash::FxHashMap;

use crate::models::MetricSample;

/// Extract, per chain, the chronologically ordered values of one metric.
///
/// Chains with no matching samples are absent from the map; the joiner
/// treats absence as an empty series. Null-valued samples are skipped since
/// a sparkline has no gap encoding. The sort is stable, so samples sharing a
/// timestamp keep their input order.
pub fn build_series(samples: &[MetricSample], metric_key: &str) -> FxHashMap<String, Vec<f64>> {
    let mut grouped: FxHashMap<String, Vec<(i64, f64)>> = FxHashMap::default();

    for sample in samples {
        if sample.metric_key != metric_key {
            continue;
        }
        if let Some(value) = sample.value {
            grouped
                .entry(sample.chain.clone())
                .or_default()
                .push((sample.unix_ms, value));
        }
    }

    grouped
        .into_iter()
        .map(|(chain, mut points)| {
            points.sort_by_key(|(ts, _)| *ts);
            (chain, points.into_iter().map(|(_, v)| v).collect())
        })
        .collect()
}
