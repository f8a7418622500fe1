//! Stage 3: depth measurements

use tracing::{info, warn};

use super::{StageContext, resolve_wellbores, write_best_effort};
use crate::error::IngestResult;
use crate::models::{DepthMeasurementIngestion, SourceSequence};
use crate::report::{EntityKind, RecordOutcome, RunSummary};
use crate::source::sequences_by_description;
use crate::transform::measurements::{
    curve_columns, depth_index_column, first_match, map_depth_measurement, measurement_columns,
};

const KIND: EntityKind = EntityKind::DepthMeasurement;

/// Map one log sequence; `Ok(None)` means the outcome is already recorded
async fn prepare(
    ctx: &StageContext<'_>,
    sequence: &SourceSequence,
    wellbore: &str,
    summary: &mut RunSummary,
) -> IngestResult<Option<DepthMeasurementIngestion>> {
    let mapping = &ctx.config.mapping.depth_measurement;
    let id = sequence.display_id();

    let depth = match depth_index_column(mapping, sequence) {
        Ok(depth) => depth,
        Err(e) => {
            warn!(sequence = %id, error = %e, "No usable depth column");
            summary.record(KIND, RecordOutcome::skipped(id, e));
            return Ok(None);
        }
    };

    let curves = curve_columns(sequence, &depth);
    let mnemonics: Vec<String> = curves.iter().map(|c| c.external_id.clone()).collect();
    let groups = match ctx.destination.search_mnemonics(&mnemonics).await {
        Ok(groups) => groups,
        Err(e) => {
            warn!(sequence = %id, error = %e, "Mnemonic search failed");
            summary.record(KIND, RecordOutcome::failed(id, e));
            return Ok(None);
        }
    };
    let columns = measurement_columns(&curves, &groups, first_match);
    if columns.is_empty() {
        summary.record(KIND, RecordOutcome::skipped(id, "no measurement columns matched"));
        return Ok(None);
    }

    let data = ctx.source.retrieve_rows(sequence).await?;
    match map_depth_measurement(mapping, wellbore, sequence, &data, &depth, columns) {
        Ok(Some(ingestion)) => Ok(Some(ingestion)),
        Ok(None) => {
            summary.record(KIND, RecordOutcome::skipped(id, "depth measurement has no rows"));
            Ok(None)
        }
        Err(e) => {
            warn!(sequence = %id, error = %e, "Rejecting depth measurement");
            summary.record(KIND, RecordOutcome::skipped(id, e));
            Ok(None)
        }
    }
}

pub async fn run(ctx: &StageContext<'_>) -> IngestResult<RunSummary> {
    let mapping = &ctx.config.mapping.depth_measurement;
    let mut summary = RunSummary::new("depth-measurements");

    info!("Retrieving sequences");
    let sequences = sequences_by_description(ctx.source, &mapping.sequence_description).await?;
    let sequences = resolve_wellbores(ctx, KIND, sequences, &mut summary).await?;

    let mut progress = ctx.progress(sequences.len(), "depth measurements");
    for (sequence, wellbore) in &sequences {
        info!("{} Processing {}", progress.advance(), sequence.display_id());
        let Some(ingestion) = prepare(ctx, sequence, wellbore, &mut summary).await? else {
            continue;
        };

        let items = [ingestion];
        write_best_effort(
            KIND,
            &items,
            1,
            |m| m.source.sequence_external_id.clone(),
            &mut summary,
            |batch| ctx.destination.ingest_depth_measurements(batch),
        )
        .await;
    }
    progress.finish();

    Ok(summary)
}
