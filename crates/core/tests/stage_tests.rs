//! End-to-end stage tests against in-memory source and destination

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use wdl_ingest_core::models::{
    AssetSource, Datum, Distance, DistanceUnitEnum, SequenceColumn, SequenceData, SequenceRow, SequenceSource,
    SourceAsset, SourceSequence, WellTops, Wellbore,
};
use wdl_ingest_core::{
    Credentials, EntityKind, IngestConfig, IngestError, InMemorySource, RecordingWellDataLayer,
    Stage, StageContext, WellDataLayer, run_stage, run_stages,
};

fn config() -> IngestConfig {
    IngestConfig::builder()
        .credentials(Credentials::with_token("https://example.com", "p", "t"))
        .build()
        .unwrap()
}

fn meta(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn osdu_well(id: i64, external_id: &str, name: &str) -> SourceAsset {
    SourceAsset {
        id,
        external_id: Some(external_id.to_string()),
        name: name.to_string(),
        metadata: meta(&[
            ("FacilityType", "Well"),
            ("Wgs84SpatialLocationX", "2.5"),
            ("Wgs84SpatialLocationY", "60.1"),
        ]),
        ..Default::default()
    }
}

fn osdu_wellbore(id: i64, external_id: &str, name: &str, parent: &str) -> SourceAsset {
    SourceAsset {
        id,
        external_id: Some(external_id.to_string()),
        name: name.to_string(),
        parent_external_id: Some(parent.to_string()),
        metadata: meta(&[("FacilityTypeID", "Wellbore"), ("CurrentOperator", "Equinor")]),
        ..Default::default()
    }
}

fn edm_asset(
    id: i64,
    external_id: &str,
    name: &str,
    parent: Option<&str>,
    metadata: &[(&str, &str)],
) -> SourceAsset {
    SourceAsset {
        id,
        external_id: Some(external_id.to_string()),
        name: name.to_string(),
        parent_external_id: parent.map(str::to_string),
        source: Some("EDM".to_string()),
        metadata: meta(metadata),
    }
}

/// EDM well "Gamma" with one wellbore and its drilling datum, plus a second
/// well "Well Gamma" whose name cleans to the same matching id
fn edm_assets() -> Vec<SourceAsset> {
    vec![
        edm_asset(
            100,
            "EDM-W1",
            "Gamma",
            None,
            &[
                ("type", "Well"),
                ("WELL_OPERATOR", "Equinor"),
                ("WELL_DESC", "Gamma appraisal"),
                ("WELLHEAD_DEPTH", "110.5"),
                ("WELLHEAD_DEPTH_DSDSUNIT", "m"),
                ("SPUD_DATE", "2001-02-03"),
            ],
        ),
        edm_asset(
            101,
            "EDM-WB1",
            "Gamma A",
            Some("EDM-W1"),
            &[("type", "Wellbore"), ("DRILLING_DATUM_ID_EDM", "D1")],
        ),
        edm_asset(
            102,
            "D1||EDMDF",
            "D1",
            None,
            &[
                ("type", "Datum"),
                ("DATUM_ELEVATION", "25"),
                ("DATUM_ELEVATION_DSDUNIT", "m"),
            ],
        ),
        edm_asset(103, "EDM-W2", "Well Gamma", None, &[("type", "Well")]),
        edm_asset(
            104,
            "EDM-WB2",
            "Gamma B",
            Some("EDM-W2"),
            &[("type", "Wellbore")],
        ),
    ]
}

fn known_wellbore(external_id: &str) -> Wellbore {
    Wellbore {
        matching_id: external_id.to_string(),
        name: external_id.to_string(),
        well_matching_id: None,
        sources: vec![AssetSource {
            asset_external_id: external_id.to_string(),
            source_name: "OSDU".to_string(),
        }],
    }
}

fn column(external_id: &str, unit: Option<&str>) -> SequenceColumn {
    SequenceColumn {
        external_id: external_id.to_string(),
        description: None,
        metadata: unit.map(|u| meta(&[("unit", u)])).unwrap_or_default(),
    }
}

fn sequence(
    id: i64,
    external_id: &str,
    description: &str,
    asset_id: i64,
    columns: Vec<SequenceColumn>,
) -> SourceSequence {
    SourceSequence {
        id,
        external_id: Some(external_id.to_string()),
        description: Some(description.to_string()),
        asset_id: Some(asset_id),
        columns,
    }
}

fn data(columns: &[&str], rows: Vec<Vec<Value>>) -> SequenceData {
    SequenceData {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| SequenceRow {
                row_number: i as i64,
                values,
            })
            .collect(),
    }
}

fn trajectory(id: i64, external_id: &str, rows: Vec<Vec<Value>>) -> (SourceSequence, SequenceData) {
    let columns = ["MeasuredDepth", "Inclination", "Azimuth"];
    (
        sequence(
            id,
            external_id,
            "Wellbore Trajectory",
            2,
            columns.iter().map(|c| column(c, None)).collect(),
        ),
        data(&columns, rows),
    )
}

fn depth_log(id: i64, external_id: &str, depths: &[f64]) -> (SourceSequence, SequenceData) {
    (
        sequence(
            id,
            external_id,
            "Wellbore Log",
            2,
            vec![column("DEPT", Some("m")), column("GR", Some("gAPI"))],
        ),
        data(
            &["DEPT", "GR"],
            depths.iter().map(|d| vec![json!(d), json!(75.0)]).collect(),
        ),
    )
}

fn markers(id: i64, external_id: &str, rows: Vec<Vec<Value>>) -> (SourceSequence, SequenceData) {
    let columns = ["STRAT_UNIT_NM", "TOP_MD", "BASE_MD"];
    (
        sequence(
            id,
            external_id,
            "Wellbore Marker",
            2,
            columns.iter().map(|c| column(c, None)).collect(),
        ),
        data(&columns, rows),
    )
}

/// Source holding well W1 "Alpha" with wellbore WB1 (asset id 2)
fn alpha_source() -> InMemorySource {
    InMemorySource::new()
        .with_asset(osdu_well(1, "W1", "Alpha"))
        .with_asset(osdu_wellbore(2, "WB1", "Alpha A", "W1"))
}

mod wells_stage_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_well_is_created() {
        let config = config();
        let source = alpha_source();
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::Wells, &ctx).await.unwrap();

        let wells = summary.counts(EntityKind::Well);
        assert_eq!((wells.created, wells.skipped, wells.failed), (1, 0, 0));
        assert_eq!(summary.counts(EntityKind::Wellbore).created, 1);

        let written = wdl.wells();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].matching_id, "Alpha");
        assert_eq!(written[0].name, "Alpha");
        assert_eq!(written[0].source.asset_external_id, "W1");
        assert_eq!(written[0].source.source_name, "OSDU");
        assert_eq!(written[0].operator.as_deref(), Some("Equinor"));
        let wellhead = written[0].wellhead.as_ref().unwrap();
        assert_eq!((wellhead.x, wellhead.y), (2.5, 60.1));

        let wellbores = wdl.wellbores();
        assert_eq!(wellbores[0].well_asset_external_id, "W1");
        assert_eq!(wellbores[0].source.asset_external_id, "WB1");
    }

    #[tokio::test]
    async fn test_sources_and_merge_rules_registered() {
        let config = config();
        let source = alpha_source();
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        run_stage(Stage::Wells, &ctx).await.unwrap();

        let names: Vec<String> = wdl.sources().into_iter().map(|s| s.name).collect();
        assert!(names.contains(&"OSDU".to_string()));
        assert!(names.contains(&"EDM".to_string()));
        assert_eq!(wdl.well_merge_rules(), vec!["EDM", "OSDU", "DISKOS"]);
        assert_eq!(wdl.wellbore_merge_rules(), wdl.well_merge_rules());
        assert!(wdl.sources().iter().all(|s| s.description.is_some()));
    }

    #[tokio::test]
    async fn test_rerun_creates_no_duplicates() {
        let config = config();
        let source = alpha_source();
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        run_stage(Stage::Wells, &ctx).await.unwrap();
        let first = (wdl.wells(), wdl.wellbores());
        run_stage(Stage::Wells, &ctx).await.unwrap();

        assert_eq!(wdl.wells(), first.0);
        assert_eq!(wdl.wellbores(), first.1);
    }

    #[tokio::test]
    async fn test_colliding_osdu_names_are_all_written() {
        let config = config();
        let source = alpha_source()
            .with_asset(osdu_well(9, "W9", "Alpha Well"))
            .with_asset(osdu_wellbore(10, "WB9", "Alpha B", "W9"));
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::Wells, &ctx).await.unwrap();

        let wells = summary.counts(EntityKind::Well);
        assert_eq!((wells.created, wells.skipped), (2, 0));
        assert_eq!(summary.counts(EntityKind::Wellbore).created, 2);
        // both wells merge into one entry keyed by the shared matching id
        assert_eq!(wdl.wells().len(), 1);
        assert_eq!(wdl.wells()[0].matching_id, "Alpha");

        let parents: Vec<String> = wdl
            .wellbores()
            .into_iter()
            .map(|wb| wb.well_asset_external_id)
            .collect();
        assert_eq!(parents, vec!["W1", "W9"]);
    }

    #[tokio::test]
    async fn test_edm_wells_wellbores_and_datums() {
        let config = config();
        let source = edm_assets()
            .into_iter()
            .fold(alpha_source(), |source, asset| source.with_asset(asset));
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::Wells, &ctx).await.unwrap();

        let wells = summary.counts(EntityKind::Well);
        assert_eq!((wells.created, wells.skipped, wells.failed), (2, 1, 0));
        assert!(wells.reasons[0].starts_with("EDM-W2: "));
        let wellbores = summary.counts(EntityKind::Wellbore);
        // the duplicate's wellbore is dropped with it
        assert_eq!((wellbores.created, wellbores.skipped), (2, 1));

        let gamma = wdl
            .wells()
            .into_iter()
            .find(|w| w.matching_id == "Gamma")
            .unwrap();
        assert_eq!(gamma.source.asset_external_id, "EDM-W1");
        assert_eq!(gamma.source.source_name, "EDM");
        assert_eq!(gamma.operator.as_deref(), Some("Equinor"));
        assert_eq!(gamma.description.as_deref(), Some("Gamma appraisal"));
        assert_eq!(
            gamma.water_depth,
            Some(Distance {
                value: 110.5,
                unit: DistanceUnitEnum::Meter,
            })
        );
        assert!(gamma.spud_date.is_some());

        let edm_wellbore = wdl
            .wellbores()
            .into_iter()
            .find(|wb| wb.source.asset_external_id == "EDM-WB1")
            .unwrap();
        assert_eq!(edm_wellbore.well_asset_external_id, "EDM-W1");
        assert_eq!(edm_wellbore.source.source_name, "EDM");
        assert_eq!(
            edm_wellbore.datum,
            Some(Datum {
                value: 25.0,
                unit: DistanceUnitEnum::Meter,
                reference: "D1".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_disabled_edm_is_not_read() {
        let mut config = config();
        config.mapping.edm.enabled = false;
        let source = edm_assets()
            .into_iter()
            .fold(alpha_source(), |source, asset| source.with_asset(asset));
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::Wells, &ctx).await.unwrap();

        let wells = summary.counts(EntityKind::Well);
        assert_eq!((wells.created, wells.skipped), (1, 0));
        assert_eq!(wdl.wells().len(), 1);
        assert_eq!(wdl.wells()[0].source.source_name, "OSDU");
        assert_eq!(wdl.wellbores().len(), 1);
        assert_eq!(wdl.wellbores()[0].source.source_name, "OSDU");
    }

    #[tokio::test]
    async fn test_failed_write_does_not_abort_batch() {
        let config = config();
        let source = alpha_source().with_asset(osdu_well(3, "W2", "Beta"));
        let wdl = RecordingWellDataLayer::new();
        wdl.reject("W2");
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::Wells, &ctx).await.unwrap();

        let wells = summary.counts(EntityKind::Well);
        assert_eq!((wells.created, wells.failed), (1, 1));
        assert!(wells.reasons[0].starts_with("W2: "));
        assert_eq!(wdl.wells().len(), 1);
        assert_eq!(wdl.wells()[0].matching_id, "Alpha");
        // wellbores are still written after the well failure
        assert_eq!(wdl.wellbores().len(), 1);
    }

    #[tokio::test]
    async fn test_source_failure_is_fatal() {
        let config = config();
        let source = InMemorySource::failing();
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        let result = run_stage(Stage::Wells, &ctx).await;

        assert!(matches!(result, Err(IngestError::Source(_))));
        assert!(wdl.wells().is_empty());
    }
}

mod trajectory_stage_tests {
    use super::*;

    #[tokio::test]
    async fn test_trajectory_written_and_empty_one_skipped() {
        let config = config();
        let (good, good_rows) = trajectory(
            10,
            "traj-1",
            vec![
                vec![json!(0.0), json!(0.0), json!(0.0)],
                vec![json!(100.0), json!(2.5), json!(370.0)],
            ],
        );
        let (empty, empty_rows) =
            trajectory(11, "traj-empty", vec![vec![json!(null), json!(1.0), json!(2.0)]]);
        let source = alpha_source()
            .with_sequence(good, good_rows)
            .with_sequence(empty, empty_rows);
        let wdl = RecordingWellDataLayer::new().with_wellbore(known_wellbore("WB1"));
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::Trajectories, &ctx).await.unwrap();

        let counts = summary.counts(EntityKind::Trajectory);
        assert_eq!((counts.created, counts.skipped, counts.failed), (1, 1, 0));

        let written = wdl.trajectories();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].wellbore_asset_external_id, "WB1");
        assert_eq!(written[0].source.sequence_external_id, "traj-1");
        assert_eq!(written[0].measured_depth_unit, DistanceUnitEnum::Foot);
        assert_eq!(written[0].rows.len(), 2);
        assert_eq!(written[0].rows[1].azimuth, 10.0);
        assert_eq!(wdl.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_wellbore_is_skipped() {
        let config = config();
        let (seq, rows) = trajectory(10, "traj-1", vec![vec![json!(1.0), json!(1.0), json!(1.0)]]);
        let source = alpha_source().with_sequence(seq, rows);
        let wdl = RecordingWellDataLayer::new();
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::Trajectories, &ctx).await.unwrap();

        assert_eq!(summary.counts(EntityKind::Trajectory).skipped, 1);
        assert!(wdl.trajectories().is_empty());
        assert_eq!(wdl.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_reads_through_and_writes_locally() {
        let config = IngestConfig::builder()
            .credentials(Credentials::with_token("https://example.com", "p", "t"))
            .dry_run(true)
            .build()
            .unwrap();
        let (seq, rows) = trajectory(10, "traj-1", vec![vec![json!(1.0), json!(1.0), json!(1.0)]]);
        let source = alpha_source().with_sequence(seq, rows);
        let live = Arc::new(RecordingWellDataLayer::new().with_wellbore(known_wellbore("WB1")));
        let upstream: Arc<dyn WellDataLayer> = live.clone();
        let dry = RecordingWellDataLayer::reading_from(upstream);
        let ctx = StageContext::new(&config, &source, &dry);

        let summary = run_stage(Stage::Trajectories, &ctx).await.unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.counts(EntityKind::Trajectory).created, 1);
        assert_eq!(dry.trajectories().len(), 1);
        assert!(live.trajectories().is_empty());
    }
}

mod depth_measurement_stage_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_monotonic_series_is_never_written() {
        let config = config();
        let (good, good_rows) = depth_log(20, "log-1", &[100.0, 100.5, 101.0]);
        let (bad, bad_rows) = depth_log(21, "log-2", &[100.0, 101.0, 100.5]);
        let source = alpha_source()
            .with_sequence(good, good_rows)
            .with_sequence(bad, bad_rows);
        let wdl = RecordingWellDataLayer::new()
            .with_wellbore(known_wellbore("WB1"))
            .with_mnemonic("GR", "gamma ray");
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::DepthMeasurements, &ctx).await.unwrap();

        let counts = summary.counts(EntityKind::DepthMeasurement);
        assert_eq!((counts.created, counts.skipped, counts.failed), (1, 1, 0));
        assert!(counts.reasons[0].starts_with("log-2: "));
        assert!(counts.reasons[0].contains("strictly increasing"));

        let written = wdl.depth_measurements();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].source.sequence_external_id, "log-1");
        assert_eq!(written[0].columns[0].measurement_type, "gamma ray");
        assert_eq!(written[0].rows.len(), 3);
        assert_eq!(wdl.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_curves_are_skipped() {
        let config = config();
        let (seq, rows) = depth_log(20, "log-1", &[100.0, 101.0]);
        let source = alpha_source().with_sequence(seq, rows);
        let wdl = RecordingWellDataLayer::new().with_wellbore(known_wellbore("WB1"));
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::DepthMeasurements, &ctx).await.unwrap();

        assert_eq!(summary.counts(EntityKind::DepthMeasurement).skipped, 1);
        assert!(wdl.depth_measurements().is_empty());
    }

    #[tokio::test]
    async fn test_mnemonic_search_failure_is_recorded() {
        let config = config();
        let (seq, rows) = depth_log(20, "log-1", &[100.0, 101.0]);
        let source = alpha_source().with_sequence(seq, rows);
        let wdl = RecordingWellDataLayer::new()
            .with_wellbore(known_wellbore("WB1"))
            .with_mnemonic("GR", "gamma ray");
        wdl.reject("GR");
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::DepthMeasurements, &ctx).await.unwrap();

        let counts = summary.counts(EntityKind::DepthMeasurement);
        assert_eq!((counts.created, counts.skipped, counts.failed), (0, 0, 1));
        assert!(counts.reasons[0].starts_with("log-1: "));
        assert!(wdl.depth_measurements().is_empty());
        assert_eq!(wdl.write_calls(), 0);
    }
}

mod well_tops_stage_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_top_keeps_last_value() {
        let config = config();
        let (first, first_rows) = markers(
            30,
            "marker-1",
            vec![
                vec![json!("Draupne Formation"), json!(100.0), json!(null)],
                vec![json!("Viking Group"), json!(90.0), json!(100.0)],
            ],
        );
        let (second, second_rows) = markers(
            31,
            "marker-2",
            vec![vec![json!("Draupne Formation"), json!(105.0), json!(120.0)]],
        );
        let source = alpha_source()
            .with_sequence(first, first_rows)
            .with_sequence(second, second_rows);
        let wdl = RecordingWellDataLayer::new().with_wellbore(known_wellbore("WB1"));
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::WellTops, &ctx).await.unwrap();

        assert_eq!(summary.counts(EntityKind::WellTops).created, 1);
        let written = wdl.well_tops();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].source.sequence_external_id, "marker-1");

        let tops = &written[0].tops;
        assert_eq!(tops.len(), 2);
        assert_eq!(tops[0].name, "Draupne Formation");
        assert_eq!(tops[0].top_measured_depth, 105.0);
        assert_eq!(tops[0].base_measured_depth, Some(120.0));
        assert_eq!(tops[1].name, "Viking Group");
    }

    #[tokio::test]
    async fn test_already_ingested_wellbore_is_skipped() {
        let config = config();
        let (seq, rows) = markers(
            30,
            "marker-1",
            vec![vec![json!("Draupne Formation"), json!(100.0), json!(null)]],
        );
        let source = alpha_source().with_sequence(seq, rows);
        let wdl = RecordingWellDataLayer::new()
            .with_wellbore(known_wellbore("WB1"))
            .with_well_tops(WellTops {
                wellbore_matching_id: Some("WB1".to_string()),
                source: SequenceSource {
                    sequence_external_id: "marker-1".to_string(),
                    source_name: "OSDU".to_string(),
                },
            });
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::WellTops, &ctx).await.unwrap();

        assert_eq!(summary.counts(EntityKind::WellTops).skipped, 1);
        assert_eq!(wdl.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_new_sequence_on_partly_ingested_wellbore_is_written() {
        let config = config();
        let (old, old_rows) = markers(
            30,
            "marker-A",
            vec![vec![json!("Viking Group"), json!(90.0), json!(100.0)]],
        );
        let (new, new_rows) = markers(
            31,
            "marker-B",
            vec![vec![json!("Draupne Formation"), json!(100.0), json!(null)]],
        );
        let source = alpha_source()
            .with_sequence(old, old_rows)
            .with_sequence(new, new_rows);
        let wdl = RecordingWellDataLayer::new()
            .with_wellbore(known_wellbore("WB1"))
            .with_well_tops(WellTops {
                wellbore_matching_id: Some("WB1".to_string()),
                source: SequenceSource {
                    sequence_external_id: "marker-A".to_string(),
                    source_name: "OSDU".to_string(),
                },
            });
        let ctx = StageContext::new(&config, &source, &wdl);

        let summary = run_stage(Stage::WellTops, &ctx).await.unwrap();

        let counts = summary.counts(EntityKind::WellTops);
        assert_eq!((counts.created, counts.skipped), (1, 0));
        let written = wdl.well_tops();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].source.sequence_external_id, "marker-B");
        assert_eq!(written[0].tops.len(), 1);
        assert_eq!(written[0].tops[0].name, "Draupne Formation");
    }
}

#[tokio::test]
async fn test_all_stages_in_order() {
    let config = config();
    let (traj, traj_rows) = trajectory(10, "traj-1", vec![vec![json!(1.0), json!(1.0), json!(1.0)]]);
    let (log, log_rows) = depth_log(20, "log-1", &[1.0, 2.0]);
    let (tops, tops_rows) = markers(
        30,
        "marker-1",
        vec![vec![json!("Draupne Formation"), json!(100.0), json!(null)]],
    );
    let source = alpha_source()
        .with_sequence(traj, traj_rows)
        .with_sequence(log, log_rows)
        .with_sequence(tops, tops_rows);
    let wdl = RecordingWellDataLayer::new().with_mnemonic("GR", "gamma ray");
    let ctx = StageContext::new(&config, &source, &wdl);

    let summaries = run_stages(&Stage::all(), &ctx).await.unwrap();

    assert_eq!(summaries.len(), 4);
    assert!(summaries.iter().all(|s| s.total_failed() == 0));
    assert_eq!(wdl.wellbores().len(), 1);
    assert_eq!(wdl.trajectories().len(), 1);
    assert_eq!(wdl.depth_measurements().len(), 1);
    assert_eq!(wdl.well_tops().len(), 1);
}
