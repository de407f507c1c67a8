use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use feewatch::{FeeStore, FeesFetcher, Settings};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    // Load configuration (optional config.yaml; defaults otherwise)
    let settings = Arc::new(Settings::new().context("Failed to load config.yaml")?);

    let fetcher = FeesFetcher::new(&settings.source).context("Failed to build fee fetcher")?;
    let store = Arc::new(FeeStore::new(fetcher, &settings.dashboard));

    let cancellation_token = CancellationToken::new();

    let poll_store = store.clone();
    let poll_interval = settings.dashboard.poll_interval_secs;
    let poll_token = cancellation_token.child_token();
    let poll_handle = tokio::spawn(async move {
        if let Err(e) = run_poll_loop(poll_store, poll_interval, poll_token).await {
            error!("Poll loop failed: {:#}", e);
        }
    });

    info!(
        "feewatch running (poll every {}s, TTL {}s). Press Ctrl+C to stop.",
        poll_interval, settings.dashboard.ttl_seconds
    );

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm_stream =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
        };
    }

    cancellation_token.cancel();
    let _ = poll_handle.await;

    info!("Poll loop stopped");
    Ok(())
}

/// Refresh on a fixed cadence and emit the joined rows as JSON lines.
///
/// The store's TTL decides whether a tick actually refetches; ticks inside
/// the TTL window just re-serve the cached result.
async fn run_poll_loop(
    store: Arc<FeeStore<FeesFetcher>>,
    poll_interval_secs: u64,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(Duration::from_secs(poll_interval_secs));

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => return Ok(()),
            _ = interval.tick() => {},
        }

        match store.current().await {
            Ok(dashboard) => {
                if dashboard.stale {
                    warn!(
                        "Serving stale data fetched at {}",
                        dashboard.data.fetched_at
                    );
                }
                info!(
                    "{} chains, {} samples, {} malformed records dropped",
                    dashboard.data.rows.len(),
                    dashboard.data.samples.len(),
                    dashboard.data.skipped_rows
                );
                for row in &dashboard.data.rows {
                    println!("{}", serde_json::to_string(row)?);
                }
            },
            Err(e) => error!("Refresh failed with no cached data to fall back on: {e}"),
        }
    }
}
