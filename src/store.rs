//! TTL-gated refresh store for the dashboard data.
//!
//! Wraps the fetcher behind a time-to-live guard: within the TTL every
//! caller gets the same cached [`DashboardData`]; once it elapses the next
//! caller triggers exactly one refetch. The lock is held across the fetch,
//! so concurrent viewers never issue duplicate requests, and a failed
//! refresh serves the last successfully built result flagged stale instead
//! of blanking the table.

use chrono::{DateTime, Duration, Utc};
use log::warn;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::chains;
use crate::config::DashboardSettings;
use crate::error::FetchError;
use crate::fetcher::{FetchBatch, SampleSource};
use crate::models::{DashboardData, Granularity, MetricSample};
use crate::pipeline::{build_series, join_series, latest_snapshot};

/// When the last successful fetch happened and how long it stays fresh.
///
/// Owned by the store, initialized once at construction; there is no global
/// state and no implicit rebinding across invocations.
#[derive(Debug, Clone)]
pub struct RefreshState {
    last_fetch: DateTime<Utc>,
    ttl: Duration,
}

impl RefreshState {
    pub fn new(now: DateTime<Utc>, ttl_seconds: u64) -> Self {
        Self {
            last_fetch: now,
            ttl: Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Stale strictly after the TTL: `now - last_fetch > ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.last_fetch > self.ttl
    }

    pub fn mark_refreshed(&mut self, now: DateTime<Utc>) {
        self.last_fetch = now;
    }

    pub fn last_fetch(&self) -> DateTime<Utc> {
        self.last_fetch
    }
}

/// One access cycle's answer: the data plus whether it outlived its TTL
/// because the refresh behind it failed.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub data: Arc<DashboardData>,
    pub stale: bool,
}

struct StoreInner {
    state: RefreshState,
    cached: Option<Arc<DashboardData>>,
}

/// TTL-cached dashboard store over a sample source.
pub struct FeeStore<S> {
    source: S,
    granularity: Granularity,
    series_metric: String,
    precision: usize,
    inner: Mutex<StoreInner>,
}

impl<S: SampleSource> FeeStore<S> {
    pub fn new(source: S, settings: &DashboardSettings) -> Self {
        Self {
            source,
            granularity: settings.granularity,
            series_metric: settings.series_metric.clone(),
            precision: settings.precision,
            inner: Mutex::new(StoreInner {
                state: RefreshState::new(Utc::now(), settings.ttl_seconds),
                cached: None,
            }),
        }
    }

    /// Current dashboard data, refetching when the cache is empty or the TTL
    /// has elapsed.
    pub async fn current(&self) -> Result<Dashboard, FetchError> {
        self.current_at(Utc::now()).await
    }

    async fn current_at(&self, now: DateTime<Utc>) -> Result<Dashboard, FetchError> {
        // Held across the fetch: concurrent callers wait here and then hit
        // the cache instead of issuing their own request.
        let mut inner = self.inner.lock().await;

        if let Some(data) = &inner.cached {
            if !inner.state.is_stale(now) {
                return Ok(Dashboard {
                    data: data.clone(),
                    stale: false,
                });
            }
        }

        match self.source.fetch().await {
            Ok(batch) => {
                let data = Arc::new(self.build(batch, now));
                inner.cached = Some(data.clone());
                inner.state.mark_refreshed(now);
                Ok(Dashboard { data, stale: false })
            },
            Err(err) => match &inner.cached {
                Some(data) => {
                    warn!(
                        "Fee feed refresh failed, serving cached data from {}: {err}",
                        data.fetched_at
                    );
                    Ok(Dashboard {
                        data: data.clone(),
                        stale: true,
                    })
                },
                None => Err(err),
            },
        }
    }

    /// Normalize, filter, and reshape one fetched batch into the three
    /// presentation shapes.
    fn build(&self, batch: FetchBatch, now: DateTime<Utc>) -> DashboardData {
        let normalized: Vec<MetricSample> =
            batch.samples.into_iter().map(chains::normalize).collect();

        let unmapped: BTreeSet<&str> = normalized
            .iter()
            .filter(|s| !chains::is_known(&s.chain))
            .map(|s| s.chain.as_str())
            .collect();
        if !unmapped.is_empty() {
            warn!("Feed contains origin keys without display names: {unmapped:?}");
        }

        let samples: Vec<MetricSample> = normalized
            .into_iter()
            .filter(|s| s.granularity == self.granularity)
            .collect();
        if samples.is_empty() {
            warn!("No samples matched granularity {}", self.granularity);
        }

        let snapshot = latest_snapshot(&samples, self.granularity);
        let series = build_series(&samples, &self.series_metric);
        let rows = join_series(snapshot, &series, self.precision);

        DashboardData {
            rows,
            series,
            samples,
            fetched_at: now,
            skipped_rows: batch.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Granularity;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct MockSource {
        samples: Vec<MetricSample>,
        calls: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl SampleSource for MockSource {
        fn fetch(
            &self,
        ) -> impl std::future::Future<Output = Result<FetchBatch, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.fail.load(Ordering::SeqCst) {
                Err(FetchError::Format("mock failure".to_string()))
            } else {
                Ok(FetchBatch {
                    samples: self.samples.clone(),
                    skipped: 0,
                })
            };
            async move { result }
        }
    }

    fn sample(chain: &str, metric: &str, unix_ms: i64, value: Option<f64>) -> MetricSample {
        MetricSample {
            chain: chain.to_string(),
            metric_key: metric.to_string(),
            granularity: Granularity::TenMin,
            unix_ms,
            value,
        }
    }

    fn store_with(
        samples: Vec<MetricSample>,
    ) -> (FeeStore<MockSource>, Arc<AtomicUsize>, Arc<AtomicBool>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fail = Arc::new(AtomicBool::new(false));
        let source = MockSource {
            samples,
            calls: calls.clone(),
            fail: fail.clone(),
        };
        let store = FeeStore::new(source, &DashboardSettings::default());
        (store, calls, fail)
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_refresh_state_staleness_boundary() {
        let mut state = RefreshState::new(t0(), 300);
        assert!(!state.is_stale(t0() + Duration::seconds(299)));
        assert!(!state.is_stale(t0() + Duration::seconds(300)));
        assert!(state.is_stale(t0() + Duration::seconds(301)));

        state.mark_refreshed(t0() + Duration::seconds(301));
        assert_eq!(state.last_fetch(), t0() + Duration::seconds(301));
        assert!(!state.is_stale(t0() + Duration::seconds(600)));
    }

    #[tokio::test]
    async fn test_first_access_always_fetches() {
        let (store, calls, _) = store_with(vec![sample(
            "optimism",
            "txcosts_median_usd",
            1000,
            Some(0.01),
        )]);

        let dash = store.current_at(t0()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!dash.stale);
        assert_eq!(dash.data.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_ttl_gates_refetch() {
        let (store, calls, _) = store_with(vec![sample(
            "optimism",
            "txcosts_median_usd",
            1000,
            Some(0.01),
        )]);

        let first = store.current_at(t0()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Within the TTL: served from cache, no fetch.
        let cached = store
            .current_at(t0() + Duration::seconds(299))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.data, &cached.data));

        // Past the TTL: exactly one fetch, last_fetch advances.
        let refreshed = store
            .current_at(t0() + Duration::seconds(301))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&first.data, &refreshed.data));

        store
            .current_at(t0() + Duration::seconds(301 + 299))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_stale_checks_fetch_once() {
        let (store, calls, _) = store_with(vec![sample(
            "optimism",
            "txcosts_median_usd",
            1000,
            Some(0.01),
        )]);

        let (a, b) = tokio::join!(store.current_at(t0()), store.current_at(t0()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a.unwrap().data, &b.unwrap().data));
    }

    #[tokio::test]
    async fn test_failed_refresh_serves_last_known_good() {
        let (store, calls, fail) = store_with(vec![sample(
            "optimism",
            "txcosts_median_usd",
            1000,
            Some(0.01),
        )]);

        let good = store.current_at(t0()).await.unwrap();
        fail.store(true, Ordering::SeqCst);

        let fallback = store
            .current_at(t0() + Duration::seconds(301))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(fallback.stale);
        assert!(Arc::ptr_eq(&good.data, &fallback.data));

        // last_fetch did not advance, so the next cycle retries.
        store
            .current_at(t0() + Duration::seconds(302))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failure_with_empty_cache_propagates() {
        let (store, _, fail) = store_with(vec![]);
        fail.store(true, Ordering::SeqCst);

        let err = store.current_at(t0()).await.unwrap_err();
        assert!(matches!(err, FetchError::Format(_)));
    }

    #[tokio::test]
    async fn test_end_to_end_dashboard_shapes() {
        let (store, _, _) = store_with(vec![
            sample("optimism", "txcosts_median_usd", 1000, Some(0.01)),
            sample("optimism", "txcosts_avg_usd", 1000, Some(0.02)),
            sample("optimism", "txcosts_median_usd", 2000, Some(0.03)),
        ]);

        let dash = store.current_at(t0()).await.unwrap();
        let data = &dash.data;

        assert_eq!(data.rows.len(), 1);
        let row = &data.rows[0];
        assert_eq!(row.chain, "OP Mainnet");
        assert_eq!(row.avg_cost, "-");
        assert_eq!(row.median_cost, "$0.030");
        assert_eq!(row.native_median_cost, "-");
        assert_eq!(
            row.last_updated,
            DateTime::from_timestamp_millis(2000).unwrap()
        );
        assert_eq!(row.series, vec![0.01, 0.03]);

        assert_eq!(data.series["OP Mainnet"], vec![0.01, 0.03]);
        assert_eq!(data.samples.len(), 3);
        assert!(data.samples.iter().all(|s| s.chain == "OP Mainnet"));
        assert_eq!(data.skipped_rows, 0);
    }

    #[tokio::test]
    async fn test_empty_batch_yields_empty_dashboard() {
        let (store, _, _) = store_with(vec![]);

        let dash = store.current_at(t0()).await.unwrap();
        assert!(dash.data.rows.is_empty());
        assert!(dash.data.series.is_empty());
        assert!(dash.data.samples.is_empty());
    }
}
