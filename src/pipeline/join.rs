//! Left join of snapshot rows with their sparkline series.

use rustc_hash::FxHashMap;

use crate::models::{DashboardRow, SnapshotRow};
use crate::utils::format_usd;

/// Attach each chain's series to its snapshot row and apply currency
/// formatting.
///
/// Left join by chain: a chain with no series gets an empty sequence, never
/// an error. Row order is inherited from the snapshot (ascending by average
/// cost); the join neither drops nor reorders rows.
pub fn join_series(
    rows: Vec<SnapshotRow>,
    series: &FxHashMap<String, Vec<f64>>,
    precision: usize,
) -> Vec<DashboardRow> {
    rows.into_iter()
        .map(|row| {
            let chain_series = series.get(&row.chain).cloned().unwrap_or_default();
            DashboardRow {
                avg_cost: format_usd(row.avg_cost_usd, precision),
                median_cost: format_usd(row.median_cost_usd, precision),
                native_median_cost: format_usd(row.native_median_cost_usd, precision),
                chain: row.chain,
                last_updated: row.last_updated,
                series: chain_series,
            }
        })
        .collect()
}
