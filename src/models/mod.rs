pub mod sample;
pub mod snapshot;

pub use sample::{Granularity, MetricKey, MetricSample};
pub use snapshot::{DashboardData, DashboardRow, SnapshotRow};
