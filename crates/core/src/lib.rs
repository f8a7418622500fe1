//! WDL Ingest Core - loads OSDU well data from a source data platform into the
//! Well Data Layer
//!
//! Provides:
//! - Mapping configuration and credentials (via [`config`])
//! - Source and destination clients behind async traits
//! - Record mapping for wells, wellbores, trajectories, depth measurements and well tops
//! - The four loader stages and their run summaries

pub mod auth;
pub mod config;
pub mod destination;
pub mod error;
pub mod http;
pub mod models;
pub mod progress;
pub mod report;
pub mod source;
pub mod stages;
pub mod transform;

// Re-export commonly used types
pub use auth::TokenProvider;
pub use config::{AuthMethod, BatchSizes, Credentials, IngestConfig, MappingConfig};
pub use destination::{RecordingWellDataLayer, WdlClient, WellDataLayer};
pub use error::{
    AuthError, ConfigError, DestinationError, IngestError, IngestResult, MappingError, SourceError,
};
pub use report::{EntityCounts, EntityKind, RecordOutcome, RunSummary};
pub use source::{CdfSourceClient, InMemorySource, SourceClient};
pub use stages::{Stage, StageContext, run_stage, run_stages};
