//! Watchlist screening service
//!
//! The service layer around `screening-core`: tabular batch ingestion, the
//! concurrent batch orchestrator, the human-in-the-loop review workflow, and
//! deployment configuration. Callers submit batches and consume results;
//! watchlist content arrives already in canonical form.

pub mod batch;
pub mod config;
pub mod error;
pub mod ingest;
pub mod review;

pub use batch::BatchScreener;
pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use ingest::parse_batch;
pub use review::{Resolution, ReviewEvent, ReviewQueue, ReviewedMatch};
