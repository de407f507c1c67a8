mod config;

pub use config::{DashboardSettings, Settings, SourceSettings};
