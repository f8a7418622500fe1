//! Trajectory survey mapping

use tracing::warn;

use crate::config::TrajectoryMapping;
use crate::error::MappingError;
use crate::models::{
    SequenceData, SequenceSource, SourceSequence, TrajectoryIngestion, TrajectoryIngestionRow,
};

fn require_column(
    data: &SequenceData,
    sequence: &SourceSequence,
    column: &str,
) -> Result<usize, MappingError> {
    data.column_index(column)
        .ok_or_else(|| MappingError::MissingColumn {
            sequence: sequence.display_id(),
            column: column.to_string(),
        })
}

fn optional_column(
    data: &SequenceData,
    sequence: &SourceSequence,
    column: Option<&str>,
) -> Result<Option<usize>, MappingError> {
    column
        .map(|c| require_column(data, sequence, c))
        .transpose()
}

/// Wrap an azimuth into `[0, 360)`
fn normalize_azimuth(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Map one trajectory sequence to a trajectory ingestion
///
/// Returns `Ok(None)` when no station survives, which callers treat as a
/// skip rather than a failure. Rows missing depth, inclination or azimuth
/// are dropped with a warning. Measured depth is scaled by the configured
/// unit factor and azimuth is normalised to `[0, 360)`.
pub fn map_trajectory(
    mapping: &TrajectoryMapping,
    wellbore_asset_external_id: &str,
    sequence: &SourceSequence,
    data: &SequenceData,
) -> Result<Option<TrajectoryIngestion>, MappingError> {
    let sequence_external_id = sequence.external_id.clone().ok_or(MappingError::MissingIdentifier)?;

    let md_index = require_column(data, sequence, &mapping.measured_depth_column)?;
    let inc_index = require_column(data, sequence, &mapping.inclination_column)?;
    let azim_index = require_column(data, sequence, &mapping.azimuth_column)?;
    let tvd_index =
        optional_column(data, sequence, mapping.true_vertical_depth_column.as_deref())?;
    let northing_index = optional_column(data, sequence, mapping.northing_column.as_deref())?;
    let easting_index = optional_column(data, sequence, mapping.easting_column.as_deref())?;

    let scale = mapping.measured_depth_unit.scale();
    let mut rows = Vec::with_capacity(data.rows.len());

    for row in &data.rows {
        let md = SequenceData::number(row, md_index).map(|v| v * scale);
        let inc = SequenceData::number(row, inc_index);
        let azim = SequenceData::number(row, azim_index).map(normalize_azimuth);

        let (Some(measured_depth), Some(inclination), Some(azimuth)) = (md, inc, azim) else {
            warn!(
                sequence = %sequence_external_id,
                row = row.row_number,
                "Ignoring row since one of the values are None: md={md:?}, inclination={inc:?}, azimuth={azim:?}"
            );
            continue;
        };

        let cell = |idx: Option<usize>| idx.and_then(|i| SequenceData::number(row, i));
        rows.push(TrajectoryIngestionRow {
            measured_depth,
            inclination,
            azimuth,
            true_vertical_depth: cell(tvd_index).map(|v| v * scale),
            northing: cell(northing_index),
            easting: cell(easting_index),
        });
    }

    if rows.is_empty() {
        warn!(sequence = %sequence_external_id, "Can't ingest trajectory since it has no rows");
        return Ok(None);
    }

    Ok(Some(TrajectoryIngestion {
        wellbore_asset_external_id: wellbore_asset_external_id.to_string(),
        source: SequenceSource {
            sequence_external_id,
            source_name: mapping.source_name.clone(),
        },
        measured_depth_unit: mapping.measured_depth_unit.unit,
        inclination_unit: mapping.inclination_unit,
        azimuth_unit: mapping.azimuth_unit,
        is_definitive: mapping.is_definitive,
        rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AngleUnitEnum, DistanceUnit, DistanceUnitEnum, SequenceRow};
    use serde_json::{Value, json};

    fn sequence() -> SourceSequence {
        SourceSequence {
            id: 10,
            external_id: Some("traj-1".to_string()),
            description: Some("Wellbore Trajectory".to_string()),
            asset_id: Some(2),
            columns: vec![],
        }
    }

    fn data(rows: Vec<Vec<Value>>) -> SequenceData {
        SequenceData {
            columns: vec![
                "MeasuredDepth".to_string(),
                "Inclination".to_string(),
                "Azimuth".to_string(),
            ],
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

    #[test]
    fn test_map_trajectory() {
        let data = data(vec![
            vec![json!(0.0), json!(0.0), json!(0.0)],
            vec![json!(100.0), json!(1.5), json!(361.0)],
            vec![json!(200.0), json!(3.0), json!(-10.0)],
        ]);
        let traj = map_trajectory(&TrajectoryMapping::default(), "WB1", &sequence(), &data)
            .unwrap()
            .unwrap();

        assert_eq!(traj.wellbore_asset_external_id, "WB1");
        assert_eq!(traj.source.sequence_external_id, "traj-1");
        assert_eq!(traj.source.source_name, "OSDU");
        assert_eq!(traj.measured_depth_unit, DistanceUnitEnum::Foot);
        assert_eq!(traj.inclination_unit, AngleUnitEnum::Degree);
        assert!(traj.is_definitive);
        assert_eq!(traj.rows.len(), 3);
        // zero is a valid station value
        assert_eq!(traj.rows[0].measured_depth, 0.0);
        assert_eq!(traj.rows[1].azimuth, 1.0);
        assert_eq!(traj.rows[2].azimuth, 350.0);
    }

    #[test]
    fn test_azimuth_stays_below_full_circle() {
        assert_eq!(normalize_azimuth(-1e-20), 0.0);
        assert_eq!(normalize_azimuth(360.0), 0.0);
        assert_eq!(normalize_azimuth(720.5), 0.5);

        let data = data(vec![vec![json!(100.0), json!(1.0), json!(-1e-20)]]);
        let traj = map_trajectory(&TrajectoryMapping::default(), "WB1", &sequence(), &data)
            .unwrap()
            .unwrap();
        assert_eq!(traj.rows[0].azimuth, 0.0);
    }

    #[test]
    fn test_rows_with_missing_values_are_dropped() {
        let data = data(vec![
            vec![json!(100.0), Value::Null, json!(10.0)],
            vec![json!(200.0), json!(2.0), json!(20.0)],
        ]);
        let traj = map_trajectory(&TrajectoryMapping::default(), "WB1", &sequence(), &data)
            .unwrap()
            .unwrap();
        assert_eq!(traj.rows.len(), 1);
        assert_eq!(traj.rows[0].measured_depth, 200.0);
    }

    #[test]
    fn test_empty_trajectory_is_none() {
        let empty = data(vec![]);
        let result = map_trajectory(&TrajectoryMapping::default(), "WB1", &sequence(), &empty);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_missing_column() {
        let mut data = data(vec![vec![json!(1.0), json!(2.0), json!(3.0)]]);
        data.columns[2] = "AZI".to_string();
        let result = map_trajectory(&TrajectoryMapping::default(), "WB1", &sequence(), &data);
        assert_eq!(
            result,
            Err(MappingError::MissingColumn {
                sequence: "traj-1".to_string(),
                column: "Azimuth".to_string()
            })
        );
    }

    #[test]
    fn test_depth_is_scaled() {
        let mapping = TrajectoryMapping {
            measured_depth_unit: DistanceUnit::with_factor(DistanceUnitEnum::Meter, 0.001),
            ..Default::default()
        };
        let data = data(vec![vec![json!(1500.0), json!(1.0), json!(2.0)]]);
        let traj = map_trajectory(&mapping, "WB1", &sequence(), &data)
            .unwrap()
            .unwrap();
        assert!((traj.rows[0].measured_depth - 1.5).abs() < 1e-9);
    }
}
