pub mod chains;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod utils;

pub use config::Settings;
pub use error::FetchError;
pub use fetcher::{FeesFetcher, SampleSource};
pub use store::{Dashboard, FeeStore, RefreshState};
