//! Stage 1: sources, wells and wellbores

use std::collections::HashSet;

use tracing::info;

use super::{StageContext, write_best_effort};
use crate::config::MappingConfig;
use crate::error::IngestResult;
use crate::models::{AssetFilter, Source};
use crate::report::{EntityKind, RecordOutcome, RunSummary};
use crate::transform::wells::{MappedWells, map_edm_wells, map_osdu_wells};

/// Register sources and merge priority
async fn setup_sources(ctx: &StageContext<'_>, mapping: &MappingConfig) -> IngestResult<()> {
    let sources: Vec<Source> = mapping
        .sources
        .sources
        .iter()
        .map(|s| Source {
            name: s.name.clone(),
            description: Some(s.description.clone()),
        })
        .collect();

    info!("Installing {} sources", sources.len());
    ctx.destination.ingest_sources(&sources).await?;

    let priority = &mapping.sources.merge_priority;
    info!(priority = ?priority, "Setting merge rules");
    ctx.destination.set_well_merge_rules(priority).await?;
    ctx.destination.set_wellbore_merge_rules(priority).await?;
    Ok(())
}

async fn read_osdu(ctx: &StageContext<'_>, mapping: &MappingConfig) -> IngestResult<MappedWells> {
    let osdu = &mapping.osdu;
    info!("Retrieving well and wellbore assets from {}", osdu.source_name);
    let wells = ctx
        .source
        .list_assets(&AssetFilter::metadata(osdu.well_filter.clone()))
        .await?;
    let wellbores = ctx
        .source
        .list_assets(&AssetFilter::metadata(osdu.wellbore_filter.clone()))
        .await?;
    info!(
        "Found {} wells and {} wellbores in {}",
        wells.len(),
        wellbores.len(),
        osdu.source_name
    );

    Ok(map_osdu_wells(osdu, &wells, &wellbores))
}

async fn read_edm(ctx: &StageContext<'_>, mapping: &MappingConfig) -> IngestResult<MappedWells> {
    let edm = &mapping.edm;
    info!("Retrieving well and wellbore assets from {}", edm.source_name);
    let filter = |metadata| AssetFilter::metadata(metadata).with_source(edm.source_name.clone());
    let wells = ctx.source.list_assets(&filter(edm.well_filter.clone())).await?;
    let wellbores = ctx
        .source
        .list_assets(&filter(edm.wellbore_filter.clone()))
        .await?;
    let datums = ctx.source.list_assets(&filter(edm.datum_filter.clone())).await?;
    info!(
        "Found {} wells, {} wellbores and {} datums in {}",
        wells.len(),
        wellbores.len(),
        datums.len(),
        edm.source_name
    );

    let mut seen = HashSet::new();
    Ok(map_edm_wells(edm, &wells, &wellbores, &datums, &mut seen))
}

/// Write one source's wells, then its wellbores
async fn write(ctx: &StageContext<'_>, mapped: MappedWells, summary: &mut RunSummary) {
    for (id, reason) in mapped.skipped_wells {
        summary.record(EntityKind::Well, RecordOutcome::skipped(id, reason));
    }
    for (id, reason) in mapped.skipped_wellbores {
        summary.record(EntityKind::Wellbore, RecordOutcome::skipped(id, reason));
    }

    let sizes = ctx.config.batch_sizes;
    write_best_effort(
        EntityKind::Well,
        &mapped.wells,
        sizes.wells,
        |w| w.source.asset_external_id.clone(),
        summary,
        |chunk| ctx.destination.ingest_wells(chunk),
    )
    .await;

    write_best_effort(
        EntityKind::Wellbore,
        &mapped.wellbores,
        sizes.wellbores,
        |wb| wb.source.asset_external_id.clone(),
        summary,
        |chunk| ctx.destination.ingest_wellbores(chunk),
    )
    .await;
}

pub async fn run(ctx: &StageContext<'_>) -> IngestResult<RunSummary> {
    let mapping = &ctx.config.mapping;
    let mut summary = RunSummary::new("wells");

    setup_sources(ctx, mapping).await?;

    let osdu = read_osdu(ctx, mapping).await?;
    write(ctx, osdu, &mut summary).await;

    if mapping.edm.enabled {
        let edm = read_edm(ctx, mapping).await?;
        write(ctx, edm, &mut summary).await;
    } else {
        info!("EDM ingestion is disabled");
    }

    Ok(summary)
}
