use std::sync::Arc;

use aq_dbsync::app::fetcher::page_url;
use aq_dbsync::infra::config;
use aq_dbsync::infra::http::HttpTransport;
use aq_dbsync::{EntityKind, PageFetcher, PgDocumentStore, RetryPolicy, RetryingClient};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-collections]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           AQ_API_ENDPOINT, HTTP_TIMEOUT_SECS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let init_collections = args.iter().any(|a| a == "--init-collections");

    // Force-read config (nice error messages if missing)
    let database_url = config::database_url()?;
    let api = config::api_endpoint();
    let timeout = config::http_timeout()?;

    println!("> Preflight:");
    println!("  AQ_API_ENDPOINT={}", api);

    // Database connectivity
    let store = PgDocumentStore::connect(&database_url).await?;
    store.ping().await?;
    println!("  Database reachable.");

    if init_collections {
        println!("  Creating collections and secondary index...");
        store.ensure_collections().await?;
    }
    for kind in EntityKind::ALL {
        match store.count(kind.collection()).await {
            Ok(n) => println!("  Collection `{}`: {} documents", kind.collection(), n),
            Err(_) if !init_collections => {
                return Err(anyhow::anyhow!(
                    "Collection `{}` does not exist. Re-run with --init-collections",
                    kind.collection()
                ));
            }
            Err(e) => return Err(e),
        }
    }

    // Upstream API: one single-record page per resource, no retries.
    let no_retry = RetryPolicy {
        max_retries: 0,
        ..RetryPolicy::default()
    };
    let transport: Arc<dyn HttpTransport> = Arc::new(RetryingClient::new(no_retry, timeout)?);
    let fetcher = PageFetcher::new(transport);
    for kind in EntityKind::ALL {
        let url = page_url(&api, kind, 1, 1);
        let page = fetcher.fetch_page(&url).await?;
        match page.total_count {
            Some(found) => println!("  /v1/{}: ok ({} records upstream)", kind.resource(), found),
            None => println!("  /v1/{}: ok (no meta.found; only one page would be synced)", kind.resource()),
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
