pub mod app;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;

// Convenience re-exports (keeps call-sites clean)
pub use app::data_processor::{DataProcessor, PageOutcome, RunSummary};
pub use app::fetcher::{PageEnvelope, PageFetcher};
pub use app::sync_service::{SyncService, TickReport};
pub use domain::model::{City, Country, Document, Entity, EntityKind, MeasurementLocation};
pub use domain::quality::classify;
pub use error::SyncError;
pub use infra::http::{HttpTransport, RetryPolicy, RetryingClient};
pub use storage::{DocumentStore, MemoryDocumentStore, PgDocumentStore, UpsertOp, WriteSummary};
