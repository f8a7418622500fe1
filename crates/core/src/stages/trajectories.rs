//! Stage 2: trajectories

use tracing::{info, warn};

use super::{StageContext, resolve_wellbores, write_best_effort};
use crate::error::IngestResult;
use crate::report::{EntityKind, RecordOutcome, RunSummary};
use crate::source::sequences_by_description;
use crate::transform::trajectories::map_trajectory;

const KIND: EntityKind = EntityKind::Trajectory;

pub async fn run(ctx: &StageContext<'_>) -> IngestResult<RunSummary> {
    let mapping = &ctx.config.mapping.trajectory;
    let mut summary = RunSummary::new("trajectories");

    info!("Retrieving sequences");
    let sequences = sequences_by_description(ctx.source, &mapping.sequence_description).await?;
    let sequences = resolve_wellbores(ctx, KIND, sequences, &mut summary).await?;

    let mut progress = ctx.progress(sequences.len(), "trajectories");
    for chunk in sequences.chunks(ctx.config.batch_sizes.trajectories) {
        let mut ingestions = Vec::with_capacity(chunk.len());
        for (sequence, wellbore) in chunk {
            let id = sequence.display_id();
            info!("{} Downloading sequence data for {}", progress.advance(), id);
            let data = ctx.source.retrieve_rows(sequence).await?;

            match map_trajectory(mapping, wellbore, sequence, &data) {
                Ok(Some(ingestion)) => ingestions.push(ingestion),
                Ok(None) => summary.record(KIND, RecordOutcome::skipped(id, "trajectory has no rows")),
                Err(e) => {
                    warn!(sequence = %id, error = %e, "Failed to map trajectory");
                    summary.record(KIND, RecordOutcome::skipped(id, e));
                }
            }
        }

        info!("Created {} trajectory ingestions", ingestions.len());
        write_best_effort(
            KIND,
            &ingestions,
            ingestions.len(),
            |t| t.source.sequence_external_id.clone(),
            &mut summary,
            |items| ctx.destination.ingest_trajectories(items),
        )
        .await;
    }
    progress.finish();

    Ok(summary)
}
