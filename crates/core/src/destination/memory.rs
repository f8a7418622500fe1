//! Recording Well Data Layer for dry runs and tests

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::WellDataLayer;
use crate::error::DestinationError;
use crate::models::{
    DepthMeasurementIngestion, MnemonicMatch, MnemonicMatchGroup, Source, TrajectoryIngestion,
    WellIngestion, WellTops, WellTopsIngestion, Wellbore, WellboreIngestion,
};

#[derive(Debug, Default)]
struct State {
    sources: BTreeMap<String, Source>,
    well_merge_rules: Vec<String>,
    wellbore_merge_rules: Vec<String>,
    wells: BTreeMap<String, WellIngestion>,
    wellbores: BTreeMap<String, WellboreIngestion>,
    known_wellbores: Vec<Wellbore>,
    trajectories: BTreeMap<String, TrajectoryIngestion>,
    depth_measurements: BTreeMap<String, DepthMeasurementIngestion>,
    well_tops: BTreeMap<String, WellTopsIngestion>,
    known_well_tops: Vec<WellTops>,
    mnemonics: BTreeMap<String, Vec<MnemonicMatch>>,
    write_calls: usize,
}

/// In-memory Well Data Layer
///
/// Ingest calls upsert into maps keyed the way the real service keys them, so
/// replaying a stage is observable as "no new entries". Used for dry runs and
/// tests. Items and mnemonics registered with [`reject`](Self::reject) make
/// the whole call fail, like a validation error from the service.
///
/// With [`reading_from`](Self::reading_from), list and search calls also
/// consult a live destination while writes stay local.
#[derive(Default)]
pub struct RecordingWellDataLayer {
    state: Mutex<State>,
    rejected: Mutex<HashSet<String>>,
    upstream: Option<Arc<dyn WellDataLayer>>,
}

impl std::fmt::Debug for RecordingWellDataLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingWellDataLayer")
            .field("upstream", &self.upstream.is_some())
            .finish_non_exhaustive()
    }
}

impl RecordingWellDataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record writes locally but answer reads from `upstream` as well
    pub fn reading_from(upstream: Arc<dyn WellDataLayer>) -> Self {
        Self {
            upstream: Some(upstream),
            ..Self::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Pretend a wellbore already exists in the destination
    pub fn with_wellbore(self, wellbore: Wellbore) -> Self {
        self.state().known_wellbores.push(wellbore);
        self
    }

    /// Pretend well tops from a sequence were already ingested
    pub fn with_well_tops(self, tops: WellTops) -> Self {
        self.state().known_well_tops.push(tops);
        self
    }

    /// Register mnemonic search results
    pub fn with_mnemonic(self, mnemonic: &str, measurement_type: &str) -> Self {
        self.state()
            .mnemonics
            .entry(mnemonic.to_string())
            .or_default()
            .push(MnemonicMatch {
                measurement_type: measurement_type.to_string(),
                primary_quantity_class: None,
            });
        self
    }

    /// Fail any ingest call containing an item with this id, and any
    /// mnemonic search for it
    pub fn reject(&self, id: &str) {
        self.rejected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string());
    }

    fn check<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Result<(), DestinationError> {
        let rejected = self.rejected.lock().unwrap_or_else(|e| e.into_inner());
        for id in ids {
            if rejected.contains(id) {
                return Err(DestinationError::Rejected(format!("{id} failed validation")));
            }
        }
        Ok(())
    }

    pub fn sources(&self) -> Vec<Source> {
        self.state().sources.values().cloned().collect()
    }

    pub fn well_merge_rules(&self) -> Vec<String> {
        self.state().well_merge_rules.clone()
    }

    pub fn wellbore_merge_rules(&self) -> Vec<String> {
        self.state().wellbore_merge_rules.clone()
    }

    pub fn wells(&self) -> Vec<WellIngestion> {
        self.state().wells.values().cloned().collect()
    }

    pub fn wellbores(&self) -> Vec<WellboreIngestion> {
        self.state().wellbores.values().cloned().collect()
    }

    pub fn trajectories(&self) -> Vec<TrajectoryIngestion> {
        self.state().trajectories.values().cloned().collect()
    }

    pub fn depth_measurements(&self) -> Vec<DepthMeasurementIngestion> {
        self.state().depth_measurements.values().cloned().collect()
    }

    pub fn well_tops(&self) -> Vec<WellTopsIngestion> {
        self.state().well_tops.values().cloned().collect()
    }

    /// Number of ingest calls that reached the store, including rejected ones
    pub fn write_calls(&self) -> usize {
        self.state().write_calls
    }

    fn record_call(&self) {
        self.state().write_calls += 1;
    }
}

#[async_trait]
impl WellDataLayer for RecordingWellDataLayer {
    async fn ingest_sources(&self, sources: &[Source]) -> Result<(), DestinationError> {
        let mut state = self.state();
        for source in sources {
            state.sources.insert(source.name.clone(), source.clone());
        }
        Ok(())
    }

    async fn set_well_merge_rules(&self, priority: &[String]) -> Result<(), DestinationError> {
        self.state().well_merge_rules = priority.to_vec();
        Ok(())
    }

    async fn set_wellbore_merge_rules(
        &self,
        priority: &[String],
    ) -> Result<(), DestinationError> {
        self.state().wellbore_merge_rules = priority.to_vec();
        Ok(())
    }

    async fn ingest_wells(&self, wells: &[WellIngestion]) -> Result<(), DestinationError> {
        self.record_call();
        self.check(wells.iter().map(|w| w.source.asset_external_id.as_str()))?;
        let mut state = self.state();
        for well in wells {
            state.wells.insert(well.matching_id.clone(), well.clone());
        }
        Ok(())
    }

    async fn ingest_wellbores(
        &self,
        wellbores: &[WellboreIngestion],
    ) -> Result<(), DestinationError> {
        self.record_call();
        self.check(wellbores.iter().map(|w| w.source.asset_external_id.as_str()))?;
        let mut state = self.state();
        for wellbore in wellbores {
            state
                .wellbores
                .insert(wellbore.matching_id.clone(), wellbore.clone());
        }
        Ok(())
    }

    async fn list_wellbores(&self) -> Result<Vec<Wellbore>, DestinationError> {
        let mut listed = match &self.upstream {
            Some(upstream) => upstream.list_wellbores().await?,
            None => Vec::new(),
        };
        let state = self.state();
        listed.extend(state.known_wellbores.iter().cloned());
        listed.extend(state.wellbores.values().map(|wb| {
            let well_matching_id = state
                .wells
                .values()
                .find(|w| w.source.asset_external_id == wb.well_asset_external_id)
                .map(|w| w.matching_id.clone());
            Wellbore {
                matching_id: wb.matching_id.clone(),
                name: wb.name.clone(),
                well_matching_id,
                sources: vec![wb.source.clone()],
            }
        }));
        Ok(listed)
    }

    async fn ingest_trajectories(
        &self,
        trajectories: &[TrajectoryIngestion],
    ) -> Result<(), DestinationError> {
        self.record_call();
        self.check(
            trajectories
                .iter()
                .map(|t| t.source.sequence_external_id.as_str()),
        )?;
        let mut state = self.state();
        for trajectory in trajectories {
            state.trajectories.insert(
                trajectory.source.sequence_external_id.clone(),
                trajectory.clone(),
            );
        }
        Ok(())
    }

    async fn ingest_depth_measurements(
        &self,
        measurements: &[DepthMeasurementIngestion],
    ) -> Result<(), DestinationError> {
        self.record_call();
        self.check(
            measurements
                .iter()
                .map(|m| m.source.sequence_external_id.as_str()),
        )?;
        let mut state = self.state();
        for measurement in measurements {
            state.depth_measurements.insert(
                measurement.source.sequence_external_id.clone(),
                measurement.clone(),
            );
        }
        Ok(())
    }

    async fn ingest_well_tops(&self, tops: &[WellTopsIngestion]) -> Result<(), DestinationError> {
        self.record_call();
        self.check(tops.iter().map(|t| t.wellbore_asset_external_id.as_str()))?;
        let mut state = self.state();
        for entry in tops {
            state
                .well_tops
                .insert(entry.wellbore_asset_external_id.clone(), entry.clone());
        }
        Ok(())
    }

    async fn list_well_tops(&self) -> Result<Vec<WellTops>, DestinationError> {
        let mut listed = match &self.upstream {
            Some(upstream) => upstream.list_well_tops().await?,
            None => Vec::new(),
        };
        let state = self.state();
        listed.extend(state.known_well_tops.iter().cloned());
        listed.extend(state.well_tops.values().map(|t| WellTops {
            wellbore_matching_id: None,
            source: t.source.clone(),
        }));
        Ok(listed)
    }

    async fn search_mnemonics(
        &self,
        mnemonics: &[String],
    ) -> Result<Vec<MnemonicMatchGroup>, DestinationError> {
        if let Some(upstream) = &self.upstream {
            return upstream.search_mnemonics(mnemonics).await;
        }
        self.check(mnemonics.iter().map(String::as_str))?;
        let state = self.state();
        Ok(mnemonics
            .iter()
            .map(|m| MnemonicMatchGroup {
                mnemonic: m.clone(),
                matches: state.mnemonics.get(m).cloned().unwrap_or_default(),
            })
            .collect())
    }
}
