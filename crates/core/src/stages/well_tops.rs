//! Stage 4: well tops

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use super::{StageContext, resolve_wellbores, write_best_effort};
use crate::error::IngestResult;
use crate::models::{SequenceData, SourceSequence};
use crate::report::{EntityKind, RecordOutcome, RunSummary};
use crate::source::sequences_by_description;
use crate::transform::well_tops::map_well_tops;

const KIND: EntityKind = EntityKind::WellTops;

/// Group sequences by wellbore, keeping first-seen order
fn group_by_wellbore(
    sequences: Vec<(SourceSequence, String)>,
) -> Vec<(String, Vec<SourceSequence>)> {
    let mut groups: Vec<(String, Vec<SourceSequence>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (sequence, wellbore) in sequences {
        match index.get(&wellbore) {
            Some(&i) => groups[i].1.push(sequence),
            None => {
                index.insert(wellbore.clone(), groups.len());
                groups.push((wellbore, vec![sequence]));
            }
        }
    }
    groups
}

pub async fn run(ctx: &StageContext<'_>) -> IngestResult<RunSummary> {
    let mapping = &ctx.config.mapping.well_top;
    let mut summary = RunSummary::new("well-tops");

    info!("Retrieving sequences");
    let sequences = sequences_by_description(ctx.source, &mapping.sequence_description).await?;
    let sequences = resolve_wellbores(ctx, KIND, sequences, &mut summary).await?;

    info!("Retrieving well tops from the Well Data Layer to prevent redundant work");
    let already_ingested: HashSet<String> = ctx
        .destination
        .list_well_tops()
        .await?
        .into_iter()
        .map(|t| t.source.sequence_external_id)
        .collect();
    info!("Found {} well tops already ingested", already_ingested.len());

    let groups = group_by_wellbore(sequences);
    let mut progress = ctx.progress(groups.len(), "well tops");

    for chunk in groups.chunks(ctx.config.batch_sizes.well_tops) {
        let mut ingestions = Vec::with_capacity(chunk.len());
        for (wellbore, sequences) in chunk {
            let prefix = progress.advance();
            let pending: Vec<&SourceSequence> = sequences
                .iter()
                .filter(|s| {
                    s.external_id
                        .as_deref()
                        .is_none_or(|id| !already_ingested.contains(id))
                })
                .collect();
            if pending.is_empty() {
                info!("{prefix} Skipping {wellbore}, all marker sequences are already ingested");
                summary.record(
                    KIND,
                    RecordOutcome::skipped(wellbore.clone(), "well tops already ingested"),
                );
                continue;
            }

            info!("{prefix} Creating well tops ingestion for {wellbore}");
            let mut data: Vec<SequenceData> = Vec::with_capacity(pending.len());
            for sequence in &pending {
                data.push(ctx.source.retrieve_rows(sequence).await?);
            }
            let pairs: Vec<(&SourceSequence, &SequenceData)> =
                pending.iter().copied().zip(&data).collect();

            match map_well_tops(mapping, wellbore, &pairs) {
                Ok(Some(ingestion)) => ingestions.push(ingestion),
                Ok(None) => summary.record(
                    KIND,
                    RecordOutcome::skipped(wellbore.clone(), "no well tops with a top depth"),
                ),
                Err(e) => {
                    warn!(wellbore = %wellbore, error = %e, "Failed to map well tops");
                    summary.record(KIND, RecordOutcome::skipped(wellbore.clone(), e));
                }
            }
        }

        write_best_effort(
            KIND,
            &ingestions,
            ingestions.len(),
            |t| t.wellbore_asset_external_id.clone(),
            &mut summary,
            |batch| ctx.destination.ingest_well_tops(batch),
        )
        .await;
    }
    progress.finish();

    Ok(summary)
}
