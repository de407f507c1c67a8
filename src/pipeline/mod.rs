//! Reshaping of the normalized sample stream into presentation shapes.
//!
//! - [`reshape`] - long-to-wide pivot and latest-row selection
//! - [`series`] - per-chain ordered value series
//! - [`join`] - snapshot/series left join with formatting

mod join;
mod reshape;
mod series;

pub use join::join_series;
pub use reshape::latest_snapshot;
pub use series::build_series;
