//! Pagination driver.
//!
//! For one entity kind: fetch page 1, normalize and upsert it, then keep
//! going while `pages_so_far * batch_size <= total`, where `total` is the
//! `meta.found` of page 1. Later pages never update the total. Any error
//! stops the run for this kind; pages already written stay written.

use crate::app::fetcher::{page_url, PageFetcher};
use crate::app::normalizer::normalize_page;
use crate::app::upsert::{build_ops, submit};
use crate::domain::model::{City, Country, Entity, EntityKind, MeasurementLocation};
use crate::error::SyncError;
use crate::infra::http::HttpTransport;
use crate::storage::{DocumentStore, WriteSummary};
use std::sync::Arc;

/// What happened to one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    /// Records in the page's `results` array.
    pub received: usize,
    /// Records that could not be decoded at all.
    pub skipped: usize,
    pub total_count: Option<u64>,
    pub written: WriteSummary,
}

/// Result of a full pagination run for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub kind: EntityKind,
    pub pages: u64,
    /// Total from page 1 (0 when it carried no metadata).
    pub total_count: u64,
    pub received: u64,
    pub skipped: u64,
    pub written: WriteSummary,
}

/// Fetches, normalizes and upserts every page of an entity kind.
pub struct DataProcessor {
    fetcher: PageFetcher,
    store: Arc<dyn DocumentStore>,
    base_url: String,
    batch_size: u64,
}

impl DataProcessor {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn DocumentStore>,
        base_url: impl Into<String>,
        batch_size: u64,
    ) -> Self {
        Self {
            fetcher: PageFetcher::new(transport),
            store,
            base_url: base_url.into(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn page_url(&self, kind: EntityKind, page: u64) -> String {
        page_url(&self.base_url, kind, self.batch_size, page)
    }

    /// Processes one page of `E` and returns its outcome (including the page's total hint).
    pub async fn process_page<E: Entity>(&self, url: &str) -> Result<PageOutcome, SyncError> {
        let envelope = self.fetcher.fetch_page(url).await?;
        let received = envelope.results.len();

        let entities: Vec<E> = normalize_page(&envelope.results);
        let skipped = received - entities.len();
        let ops = build_ops(entities);
        let written = submit(self.store.as_ref(), E::KIND.collection(), &ops).await?;

        Ok(PageOutcome {
            received,
            skipped,
            total_count: envelope.total_count,
            written,
        })
    }

    /// Runs every page of `E`, strictly in increasing page order.
    pub async fn process_kind<E: Entity>(&self) -> Result<RunSummary, SyncError> {
        let kind = E::KIND;
        let mut page: u64 = 1;

        let first = self.process_page::<E>(&self.page_url(kind, page)).await?;
        self.log_page(kind, page, &first);

        let total = first.total_count.unwrap_or(0);
        let mut summary = RunSummary {
            kind,
            pages: 1,
            total_count: total,
            received: first.received as u64,
            skipped: first.skipped as u64,
            written: first.written,
        };

        while page.saturating_mul(self.batch_size) <= total {
            page += 1;
            let outcome = self.process_page::<E>(&self.page_url(kind, page)).await?;
            self.log_page(kind, page, &outcome);

            summary.pages += 1;
            summary.received += outcome.received as u64;
            summary.skipped += outcome.skipped as u64;
            summary.written.add(outcome.written);
        }

        Ok(summary)
    }

    /// Runs the kind selected at runtime.
    pub async fn process(&self, kind: EntityKind) -> Result<RunSummary, SyncError> {
        match kind {
            EntityKind::Location => self.process_kind::<MeasurementLocation>().await,
            EntityKind::City => self.process_kind::<City>().await,
            EntityKind::Country => self.process_kind::<Country>().await,
        }
    }

    fn log_page(&self, kind: EntityKind, page: u64, outcome: &PageOutcome) {
        tracing::info!(
            %kind,
            page,
            received = outcome.received,
            skipped = outcome.skipped,
            inserted = outcome.written.inserted,
            replaced = outcome.written.replaced,
            unchanged = outcome.written.unchanged,
            "page synced"
        );
    }
}
