//! Run orchestrator: one pass over every entity kind per tick.

use crate::app::data_processor::{DataProcessor, RunSummary};
use crate::domain::model::EntityKind;
use crate::error::SyncError;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Per-kind results of one tick, in processing order.
#[derive(Debug)]
pub struct TickReport {
    pub results: Vec<(EntityKind, Result<RunSummary, SyncError>)>,
}

impl TickReport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (EntityKind, &SyncError)> {
        self.results
            .iter()
            .filter_map(|(kind, r)| r.as_ref().err().map(|e| (*kind, e)))
    }

    pub fn get(&self, kind: EntityKind) -> Option<&Result<RunSummary, SyncError>> {
        self.results.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }
}

pub struct SyncService {
    processor: DataProcessor,
    shutdown: Arc<Notify>,
}

impl SyncService {
    pub fn new(processor: DataProcessor) -> Self {
        Self {
            processor,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Runs locations, cities and countries sequentially.
    ///
    /// A failing kind is logged and reported; the remaining kinds still run.
    pub async fn run_once(&self) -> TickReport {
        let mut results = Vec::with_capacity(EntityKind::ALL.len());

        for kind in EntityKind::ALL {
            let result = self.processor.process(kind).await;
            match &result {
                Ok(summary) => tracing::info!(
                    %kind,
                    pages = summary.pages,
                    total = summary.total_count,
                    received = summary.received,
                    skipped = summary.skipped,
                    inserted = summary.written.inserted,
                    replaced = summary.written.replaced,
                    unchanged = summary.written.unchanged,
                    "sync run finished"
                ),
                Err(e) => tracing::error!(
                    %kind,
                    error_kind = e.label(),
                    error = %e,
                    "sync run failed; retrying on next tick"
                ),
            }
            results.push((kind, result));
        }

        TickReport { results }
    }

    /// Ticks every `period` until [`SyncService::shutdown`] is called.
    ///
    /// The first tick fires immediately. A tick never overlaps the previous
    /// one: ticks missed while a run was in flight are skipped.
    pub async fn run_forever(&self, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.notified() => {
                    tracing::info!("sync loop shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let report = self.run_once().await;
                    if !report.is_success() {
                        tracing::warn!(failed = report.failures().count(), "tick finished with failures");
                    }
                }
            }
        }
    }

    /// Stops [`SyncService::run_forever`] once the current tick (if any) is done.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}
