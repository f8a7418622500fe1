//! Writes to the Well Data Layer
//!
//! All ingest calls are upserts keyed by matching id or source reference;
//! re-sending a record overwrites it.

mod memory;
mod wdl;

pub use memory::RecordingWellDataLayer;
pub use wdl::WdlClient;

use async_trait::async_trait;

use crate::error::DestinationError;
use crate::models::{
    DepthMeasurementIngestion, MnemonicMatchGroup, Source, TrajectoryIngestion, WellIngestion,
    WellTops, WellTopsIngestion, Wellbore, WellboreIngestion,
};

/// Destination operations used by the loader stages
#[async_trait]
pub trait WellDataLayer: Send + Sync {
    /// Register sources
    async fn ingest_sources(&self, sources: &[Source]) -> Result<(), DestinationError>;

    /// Set the source priority used when merging wells
    async fn set_well_merge_rules(&self, priority: &[String]) -> Result<(), DestinationError>;

    /// Set the source priority used when merging wellbores
    async fn set_wellbore_merge_rules(&self, priority: &[String])
    -> Result<(), DestinationError>;

    async fn ingest_wells(&self, wells: &[WellIngestion]) -> Result<(), DestinationError>;

    async fn ingest_wellbores(
        &self,
        wellbores: &[WellboreIngestion],
    ) -> Result<(), DestinationError>;

    /// Every wellbore known to the destination
    async fn list_wellbores(&self) -> Result<Vec<Wellbore>, DestinationError>;

    async fn ingest_trajectories(
        &self,
        trajectories: &[TrajectoryIngestion],
    ) -> Result<(), DestinationError>;

    async fn ingest_depth_measurements(
        &self,
        measurements: &[DepthMeasurementIngestion],
    ) -> Result<(), DestinationError>;

    async fn ingest_well_tops(&self, tops: &[WellTopsIngestion]) -> Result<(), DestinationError>;

    /// Every well tops entry known to the destination
    async fn list_well_tops(&self) -> Result<Vec<WellTops>, DestinationError>;

    /// Look up measurement types for mnemonics, one group per input in order
    async fn search_mnemonics(
        &self,
        mnemonics: &[String],
    ) -> Result<Vec<MnemonicMatchGroup>, DestinationError>;
}
