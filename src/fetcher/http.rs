use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::SourceSettings;
use crate::error::FetchError;
use crate::models::{Granularity, MetricSample};

use super::{FetchBatch, SampleSource};

/// HTTP fetcher for the growthepie fee feed.
///
/// One GET returns the full working set as a flat JSON array; there is no
/// pagination and no authentication. The transport timeout is enforced here
/// since the upstream has none.
#[derive(Debug, Clone)]
pub struct FeesFetcher {
    http: reqwest::Client,
    endpoint: Url,
}

/// Wire shape of one feed record. Extra fields are ignored; a record that
/// fails to deserialize (missing field, wrong type, unknown granularity tag)
/// is dropped and counted rather than failing the batch.
#[derive(Debug, Deserialize)]
struct RawRecord {
    origin_key: String,
    metric_key: String,
    granularity: Granularity,
    unix: i64,
    value: Option<f64>,
}

impl FeesFetcher {
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        let endpoint = Url::parse(&settings.endpoint)
            .with_context(|| format!("Invalid feed endpoint: {}", settings.endpoint))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, endpoint })
    }

    pub async fn fetch(&self) -> Result<FetchBatch, FetchError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(FetchError::Network)?
            .error_for_status()
            .map_err(FetchError::Network)?;

        let body = response.text().await.map_err(FetchError::Network)?;
        let batch = parse_records(&body)?;

        if batch.skipped > 0 {
            log::warn!(
                "Dropped {} malformed records from fee feed ({} kept)",
                batch.skipped,
                batch.samples.len()
            );
        }

        Ok(batch)
    }
}

impl SampleSource for FeesFetcher {
    fn fetch(&self) -> impl std::future::Future<Output = Result<FetchBatch, FetchError>> + Send {
        FeesFetcher::fetch(self)
    }
}

/// Parse a feed response body into validated samples.
///
/// The body must be a JSON array; anything else is a [`FetchError::Format`].
/// Individual records are validated one by one so a single malformed record
/// cannot blank the whole batch.
pub fn parse_records(body: &str) -> Result<FetchBatch, FetchError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| FetchError::Format(format!("expected a JSON array of records: {e}")))?;

    let mut samples = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for record in records {
        match serde_json::from_value::<RawRecord>(record) {
            Ok(raw) if raw.unix >= 0 => samples.push(MetricSample {
                chain: raw.origin_key,
                metric_key: raw.metric_key,
                granularity: raw.granularity,
                unix_ms: raw.unix,
                value: raw.value,
            }),
            _ => skipped += 1,
        }
    }

    Ok(FetchBatch { samples, skipped })
}
