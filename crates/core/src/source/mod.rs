//! Read-only access to the source system
//!
//! Stages only see the [`SourceClient`] trait. [`CdfSourceClient`] talks to the
//! Cognite API, [`InMemorySource`] serves fixed records for tests.

mod cdf;
mod memory;

pub use cdf::CdfSourceClient;
pub use memory::InMemorySource;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{AssetFilter, SequenceData, SourceAsset, SourceSequence};

/// Query interface over source assets and sequences
///
/// Implementations handle pagination internally and return complete result
/// sets.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// List all assets matching a filter
    async fn list_assets(&self, filter: &AssetFilter) -> Result<Vec<SourceAsset>, SourceError>;

    /// Retrieve assets by internal id; unknown ids are ignored
    async fn retrieve_assets(&self, ids: &[i64]) -> Result<Vec<SourceAsset>, SourceError>;

    /// List all sequence headers
    async fn list_sequences(&self) -> Result<Vec<SourceSequence>, SourceError>;

    /// Retrieve every row of a sequence
    async fn retrieve_rows(&self, sequence: &SourceSequence) -> Result<SequenceData, SourceError>;
}

/// Sequences with the given description
pub async fn sequences_by_description(
    source: &dyn SourceClient,
    description: &str,
) -> Result<Vec<SourceSequence>, SourceError> {
    let sequences = source.list_sequences().await?;
    let total = sequences.len();
    let matching: Vec<_> = sequences
        .into_iter()
        .filter(|s| s.description.as_deref() == Some(description))
        .collect();
    tracing::info!(
        description,
        "Found {total} sequences and identified {} matching",
        matching.len()
    );
    Ok(matching)
}
