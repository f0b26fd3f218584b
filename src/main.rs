//! Sync daemon entrypoint.
//!
//! Usage: `aq-dbsync [--once]`
//!
//! Configuration comes from the environment (see `infra::config`). With
//! `--once` a single tick runs and the exit code reports whether every
//! entity kind succeeded; otherwise ticks repeat every `SYNC_INTERVAL_SECS`
//! until Ctrl+C.

use std::sync::Arc;

use aq_dbsync::infra::config::SyncConfig;
use aq_dbsync::infra::logging::init_tracing;
use aq_dbsync::{DataProcessor, PgDocumentStore, RetryingClient, SyncService};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: aq-dbsync [--once]\n\
         \n\
         Env vars:\n\
           DATABASE_URL (required), AQ_API_ENDPOINT, BATCH_SIZE, HTTP_RETRY_COUNT,\n\
           HTTP_RETRY_WAIT_MIN_SECS, HTTP_RETRY_WAIT_MAX_SECS, HTTP_TIMEOUT_SECS,\n\
           SYNC_INTERVAL_SECS, RUST_LOG\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    if let Some(unknown) = args.iter().find(|a| a.as_str() != "--once") {
        eprintln!("Unknown argument: {}", unknown);
        usage_and_exit();
    }
    let once = args.iter().any(|a| a == "--once");

    let config = SyncConfig::from_env()?;
    init_tracing();

    tracing::info!(
        api = %config.api_endpoint,
        batch_size = config.batch_size,
        retries = config.retry.max_retries,
        interval_secs = config.sync_interval.as_secs(),
        "starting aq-dbsync"
    );

    let store = PgDocumentStore::connect(&config.database_url).await?;
    store.ping().await?;
    store.ensure_collections().await?;

    let transport = RetryingClient::new(config.retry, config.http_timeout)?;
    let processor = DataProcessor::new(
        Arc::new(transport),
        Arc::new(store),
        config.api_endpoint.clone(),
        config.batch_size,
    );
    let service = Arc::new(SyncService::new(processor));

    if once {
        let report = service.run_once().await;
        if !report.is_success() {
            for (kind, err) in report.failures() {
                eprintln!("{} failed: {}", kind, err);
            }
            std::process::exit(1);
        }
        return Ok(());
    }

    let service_for_shutdown = service.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received; finishing current tick");
            service_for_shutdown.shutdown();
        }
    });

    service.run_forever(config.sync_interval).await;
    Ok(())
}
