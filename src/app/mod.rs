pub mod data_processor;
pub mod fetcher;
pub mod normalizer;
pub mod sync_service;
pub mod upsert;
