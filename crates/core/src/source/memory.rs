//! In-memory source for tests and local runs

use std::collections::HashMap;

use async_trait::async_trait;

use super::SourceClient;
use crate::error::SourceError;
use crate::models::{AssetFilter, SequenceData, SourceAsset, SourceSequence};

/// Source backed by in-memory records
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    assets: Vec<SourceAsset>,
    sequences: Vec<SourceSequence>,
    rows: HashMap<i64, SequenceData>,
    fail_listing: bool,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset
    pub fn with_asset(mut self, asset: SourceAsset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Add a sequence and its rows
    pub fn with_sequence(mut self, sequence: SourceSequence, data: SequenceData) -> Self {
        self.rows.insert(sequence.id, data);
        self.sequences.push(sequence);
        self
    }

    /// Make every listing call fail, to exercise source-read errors
    pub fn failing() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    fn check(&self, endpoint: &str) -> Result<(), SourceError> {
        if self.fail_listing {
            return Err(SourceError::Network {
                endpoint: endpoint.to_string(),
                reason: "source unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SourceClient for InMemorySource {
    async fn list_assets(&self, filter: &AssetFilter) -> Result<Vec<SourceAsset>, SourceError> {
        self.check("assets/list")?;
        Ok(self
            .assets
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    async fn retrieve_assets(&self, ids: &[i64]) -> Result<Vec<SourceAsset>, SourceError> {
        self.check("assets/byids")?;
        Ok(self
            .assets
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list_sequences(&self) -> Result<Vec<SourceSequence>, SourceError> {
        self.check("sequences/list")?;
        Ok(self.sequences.clone())
    }

    async fn retrieve_rows(&self, sequence: &SourceSequence) -> Result<SequenceData, SourceError> {
        self.check("sequences/data/list")?;
        Ok(self.rows.get(&sequence.id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_filters_assets() {
        let source = InMemorySource::new()
            .with_asset(SourceAsset {
                id: 1,
                external_id: Some("W1".to_string()),
                metadata: [("FacilityType".to_string(), "Well".to_string())].into(),
                ..Default::default()
            })
            .with_asset(SourceAsset {
                id: 2,
                external_id: Some("WB1".to_string()),
                ..Default::default()
            });

        let filter =
            AssetFilter::metadata([("FacilityType".to_string(), "Well".to_string())].into());
        let wells = source.list_assets(&filter).await.unwrap();
        assert_eq!(wells.len(), 1);
        assert_eq!(source.retrieve_assets(&[2, 99]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = InMemorySource::failing();
        assert!(source.list_sequences().await.is_err());
    }
}
