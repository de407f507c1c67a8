//! Retrieval of the raw fee-metric record set.

mod http;

pub use http::{parse_records, FeesFetcher};

use crate::error::FetchError;
use crate::models::MetricSample;

/// Result of one feed retrieval: the validated samples plus the number of
/// malformed records dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct FetchBatch {
    pub samples: Vec<MetricSample>,
    pub skipped: usize,
}

/// Anything that can produce a batch of fee samples.
///
/// [`FeesFetcher`] is the production source; tests plug in counting or
/// failing sources to drive the refresh store.
pub trait SampleSource {
    fn fetch(&self) -> impl std::future::Future<Output = Result<FetchBatch, FetchError>> + Send;
}
