//! Per-record outcomes and the run summary

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reasons kept per entity kind
const MAX_REASONS: usize = 100;

/// Entity types written by the stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Well,
    Wellbore,
    Trajectory,
    DepthMeasurement,
    WellTops,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Well => "wells",
            EntityKind::Wellbore => "wellbores",
            EntityKind::Trajectory => "trajectories",
            EntityKind::DepthMeasurement => "depth measurements",
            EntityKind::WellTops => "well tops",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to one source record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Written (created or overwritten) in the destination
    Created { id: String },
    /// Not written; not an error
    Skipped { id: String, reason: String },
    /// Mapping or write failure
    Failed { id: String, reason: String },
}

impl RecordOutcome {
    pub fn created(id: impl Into<String>) -> Self {
        RecordOutcome::Created { id: id.into() }
    }

    pub fn skipped(id: impl Into<String>, reason: impl ToString) -> Self {
        RecordOutcome::Skipped {
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn failed(id: impl Into<String>, reason: impl ToString) -> Self {
        RecordOutcome::Failed {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Counts for one entity kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    /// First skip and failure reasons, `id: reason`
    pub reasons: Vec<String>,
}

impl EntityCounts {
    fn add_reason(&mut self, id: &str, reason: &str) {
        if self.reasons.len() < MAX_REASONS {
            self.reasons.push(format!("{id}: {reason}"));
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.skipped + self.failed
    }
}

/// Aggregated outcomes of a stage run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique id of this run, for correlating logs
    pub run_id: Uuid,
    /// Stage name
    pub stage: String,
    pub counts: BTreeMap<EntityKind, EntityCounts>,
    /// Whether writes went to the in-memory destination
    pub dry_run: bool,
    #[serde(skip)]
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            stage: stage.into(),
            counts: BTreeMap::new(),
            dry_run: false,
            duration: Duration::ZERO,
        }
    }

    /// Record an outcome for an entity kind
    pub fn record(&mut self, kind: EntityKind, outcome: RecordOutcome) {
        let counts = self.counts.entry(kind).or_default();
        match outcome {
            RecordOutcome::Created { .. } => counts.created += 1,
            RecordOutcome::Skipped { id, reason } => {
                counts.skipped += 1;
                counts.add_reason(&id, &reason);
            }
            RecordOutcome::Failed { id, reason } => {
                counts.failed += 1;
                counts.add_reason(&id, &reason);
            }
        }
    }

    /// Counts for a kind; zero if nothing was recorded
    pub fn counts(&self, kind: EntityKind) -> EntityCounts {
        self.counts.get(&kind).cloned().unwrap_or_default()
    }

    pub fn total_failed(&self) -> usize {
        self.counts.values().map(|c| c.failed).sum()
    }

    /// Add another run's counts and duration to this one
    pub fn merge(&mut self, other: RunSummary) {
        for (kind, counts) in other.counts {
            let mine = self.counts.entry(kind).or_default();
            mine.created += counts.created;
            mine.skipped += counts.skipped;
            mine.failed += counts.failed;
            for reason in counts.reasons {
                if mine.reasons.len() < MAX_REASONS {
                    mine.reasons.push(reason);
                }
            }
        }
        self.duration += other.duration;
    }

    /// Format duration as human-readable string
    pub fn duration_string(&self) -> String {
        let secs = self.duration.as_secs();
        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Stage '{}' finished in {} (run {}){}",
            self.stage,
            self.duration_string(),
            self.run_id,
            if self.dry_run { " [dry run]" } else { "" }
        )?;
        for (kind, counts) in &self.counts {
            writeln!(
                f,
                "  {:<20} created={}, skipped={}, failed={}",
                kind.name(),
                counts.created,
                counts.skipped,
                counts.failed
            )?;
            for reason in counts.reasons.iter().take(5) {
                writeln!(f, "    - {reason}")?;
            }
            if counts.reasons.len() > 5 {
                writeln!(f, "    ... and {} more", counts.reasons.len() - 5)?;
            }
        }
        Ok(())
    }
}
