//! Loader stages
//!
//! Four stages run in dependency order: wells and wellbores first, then the
//! wellbore-keyed trajectories, depth measurements and well tops. Each stage
//! reads from a [`SourceClient`], maps with [`crate::transform`] and writes to
//! a [`WellDataLayer`], returning a [`RunSummary`].

pub mod depth_measurements;
pub mod trajectories;
pub mod well_tops;
pub mod wells;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info, info_span, warn};

use crate::config::IngestConfig;
use crate::destination::WellDataLayer;
use crate::error::{DestinationError, IngestResult, MappingError};
use crate::models::SourceSequence;
use crate::progress::StageProgress;
use crate::report::{EntityKind, RecordOutcome, RunSummary};
use crate::source::SourceClient;

/// Loader stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Stage 1: Wells and wellbores
    Wells,
    /// Stage 2: Trajectories
    Trajectories,
    /// Stage 3: Depth measurements
    DepthMeasurements,
    /// Stage 4: Well tops
    WellTops,
}

impl Stage {
    /// Get all stages in execution order
    pub fn all() -> Vec<Self> {
        vec![
            Self::Wells,
            Self::Trajectories,
            Self::DepthMeasurements,
            Self::WellTops,
        ]
    }

    /// Get stage name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wells => "wells",
            Self::Trajectories => "trajectories",
            Self::DepthMeasurements => "depth-measurements",
            Self::WellTops => "well-tops",
        }
    }

    /// Get stage description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Wells => "Register sources, ingest wells and wellbores",
            Self::Trajectories => "Ingest trajectory surveys for known wellbores",
            Self::DepthMeasurements => "Ingest depth-indexed logs for known wellbores",
            Self::WellTops => "Ingest well tops for known wellbores",
        }
    }

    /// Get stage index (1-based)
    pub fn index(&self) -> usize {
        match self {
            Self::Wells => 1,
            Self::Trajectories => 2,
            Self::DepthMeasurements => 3,
            Self::WellTops => 4,
        }
    }

    /// Whether the stage needs wellbores from stage 1
    pub fn requires_wellbores(&self) -> bool {
        !matches!(self, Self::Wells)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wells" | "wellbores" | "wells-and-wellbores" | "1" => Ok(Self::Wells),
            "trajectories" | "2" => Ok(Self::Trajectories),
            "depth-measurements" | "measurements" | "3" => Ok(Self::DepthMeasurements),
            "well-tops" | "tops" | "4" => Ok(Self::WellTops),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Everything a stage run needs
pub struct StageContext<'a> {
    pub config: &'a IngestConfig,
    pub source: &'a dyn SourceClient,
    pub destination: &'a dyn WellDataLayer,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl<'a> StageContext<'a> {
    pub fn new(
        config: &'a IngestConfig,
        source: &'a dyn SourceClient,
        destination: &'a dyn WellDataLayer,
    ) -> Self {
        Self {
            config,
            source,
            destination,
            show_progress: false,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub(crate) fn progress(&self, total: usize, label: &str) -> StageProgress {
        if self.show_progress {
            StageProgress::new(total, label)
        } else {
            StageProgress::hidden(total)
        }
    }
}

/// Run one stage and return its summary
///
/// Only configuration, source-read and destination setup failures are
/// returned as errors; per-record problems end up in the summary.
pub async fn run_stage(stage: Stage, ctx: &StageContext<'_>) -> IngestResult<RunSummary> {
    let started = Instant::now();
    let span = info_span!("stage", stage = stage.name(), dry_run = ctx.config.dry_run);

    let result = async {
        info!("Starting stage {}: {}", stage.index(), stage.description());
        match stage {
            Stage::Wells => wells::run(ctx).await,
            Stage::Trajectories => trajectories::run(ctx).await,
            Stage::DepthMeasurements => depth_measurements::run(ctx).await,
            Stage::WellTops => well_tops::run(ctx).await,
        }
    }
    .instrument(span)
    .await;

    let mut summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!(stage = stage.name(), error = %e, "Stage failed");
            return Err(e);
        }
    };
    summary.duration = started.elapsed();
    summary.dry_run = ctx.config.dry_run;

    info!(
        stage = stage.name(),
        failed = summary.total_failed(),
        duration = %summary.duration_string(),
        "Stage complete"
    );
    Ok(summary)
}

/// Run several stages in order, stopping at the first fatal error
pub async fn run_stages(stages: &[Stage], ctx: &StageContext<'_>) -> IngestResult<Vec<RunSummary>> {
    let mut summaries = Vec::with_capacity(stages.len());
    for &stage in stages {
        summaries.push(run_stage(stage, ctx).await?);
    }
    Ok(summaries)
}

/// Write items in chunks; a failed chunk is retried one item at a time
///
/// Every item ends up in the summary as created or failed. Write errors never
/// propagate.
pub(crate) async fn write_best_effort<'a, T, F, Fut>(
    kind: EntityKind,
    items: &'a [T],
    chunk_size: usize,
    id_of: impl Fn(&T) -> String,
    summary: &mut RunSummary,
    write: F,
) where
    F: Fn(&'a [T]) -> Fut,
    Fut: Future<Output = Result<(), DestinationError>>,
{
    if items.is_empty() {
        return;
    }
    let chunk_size = chunk_size.max(1);
    let total_chunks = items.len().div_ceil(chunk_size);
    info!("Ingesting {} {}", items.len(), kind);

    for (i, chunk) in items.chunks(chunk_size).enumerate() {
        match write(chunk).await {
            Ok(()) => {
                info!(
                    chunk = i + 1,
                    chunks = total_chunks,
                    "Ingested {} {}",
                    chunk.len(),
                    kind
                );
                for item in chunk {
                    summary.record(kind, RecordOutcome::created(id_of(item)));
                }
            }
            Err(e) if chunk.len() == 1 => {
                error!(id = %id_of(&chunk[0]), error = %e, "Failed to ingest {}", kind);
                summary.record(kind, RecordOutcome::failed(id_of(&chunk[0]), &e));
            }
            Err(e) => {
                warn!(
                    chunk = i + 1,
                    error = %e,
                    "Failed to ingest chunk of {}, retrying one by one",
                    kind
                );
                for item in chunk {
                    let id = id_of(item);
                    match write(std::slice::from_ref(item)).await {
                        Ok(()) => summary.record(kind, RecordOutcome::created(id)),
                        Err(e) => {
                            error!(id = %id, error = %e, "Failed to ingest {}", kind);
                            summary.record(kind, RecordOutcome::failed(id, &e));
                        }
                    }
                }
            }
        }
    }
}

/// Pair sequences with the external id of their wellbore
///
/// A sequence is kept only when its asset resolves and the wellbore exists in
/// the destination; everything else is recorded as skipped.
pub(crate) async fn resolve_wellbores(
    ctx: &StageContext<'_>,
    kind: EntityKind,
    sequences: Vec<SourceSequence>,
    summary: &mut RunSummary,
) -> IngestResult<Vec<(SourceSequence, String)>> {
    let asset_ids: Vec<i64> = sequences
        .iter()
        .filter_map(|s| s.asset_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    info!("Retrieving {} wellbore assets", asset_ids.len());
    let external_ids: HashMap<i64, String> = ctx
        .source
        .retrieve_assets(&asset_ids)
        .await?
        .into_iter()
        .filter_map(|a| a.identifier().map(|id| (a.id, id.to_string())))
        .collect();

    let known: HashSet<String> = ctx
        .destination
        .list_wellbores()
        .await?
        .into_iter()
        .flat_map(|wb| wb.sources.into_iter().map(|s| s.asset_external_id))
        .collect();
    info!("Found {} wellbores in the Well Data Layer", known.len());

    let mut resolved = Vec::with_capacity(sequences.len());
    for sequence in sequences {
        let id = sequence.display_id();
        let reason = match sequence.asset_id {
            None => MappingError::MissingField {
                record: id.clone(),
                field: "asset_id".to_string(),
            },
            Some(asset_id) => match external_ids.get(&asset_id) {
                None => MappingError::UnknownWellbore(format!("asset #{asset_id}")),
                Some(external_id) if !known.contains(external_id) => {
                    MappingError::UnknownWellbore(external_id.clone())
                }
                Some(external_id) => {
                    resolved.push((sequence, external_id.clone()));
                    continue;
                }
            },
        };
        warn!(sequence = %id, reason = %reason, "Skipping sequence");
        summary.record(kind, RecordOutcome::skipped(id, reason));
    }
    Ok(resolved)
}
