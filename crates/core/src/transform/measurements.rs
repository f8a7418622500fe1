//! Depth-indexed measurement mapping
//!
//! A log sequence has one depth index column and any number of curves. The
//! index is found by column id, the curves are resolved through the Well Data
//! Layer mnemonic search, and the rows are validated before anything is sent.

use tracing::{debug, warn};

use super::units::parse_unit;
use crate::config::DepthMeasurementMapping;
use crate::error::MappingError;
use crate::models::{
    DepthIndexColumn, DepthMeasurementColumn, DepthMeasurementIngestion, DepthMeasurementRow,
    DistanceUnit, MnemonicMatch, MnemonicMatchGroup, SequenceColumn, SequenceData,
    SequenceSource, SourceSequence,
};

/// Find the depth index column of a sequence and parse its unit
pub fn depth_index_column(
    mapping: &DepthMeasurementMapping,
    sequence: &SourceSequence,
) -> Result<DepthIndexColumn, MappingError> {
    let column = sequence
        .columns
        .iter()
        .find(|c| {
            mapping
                .depth_column_ids
                .iter()
                .any(|id| id.eq_ignore_ascii_case(&c.external_id))
        })
        .ok_or_else(|| MappingError::MissingColumn {
            sequence: sequence.display_id(),
            column: mapping.depth_column_ids.join("|"),
        })?;

    let unit = column.unit();
    let parsed = parse_unit(&unit).ok_or_else(|| MappingError::UnknownUnit {
        column: column.external_id.clone(),
        unit,
    })?;

    Ok(DepthIndexColumn {
        column_external_id: column.external_id.clone(),
        unit: parsed,
        depth_type: mapping.depth_type.clone(),
    })
}

/// Pick a match for a column out of the mnemonic search results
pub type FindBestMatch = fn(&SequenceColumn, &[MnemonicMatch]) -> Option<MnemonicMatch>;

/// Default match selection: first candidate wins
pub fn first_match(_column: &SequenceColumn, matches: &[MnemonicMatch]) -> Option<MnemonicMatch> {
    matches.first().cloned()
}

/// Curve columns of a sequence, i.e. everything except the depth index
pub fn curve_columns<'a>(
    sequence: &'a SourceSequence,
    depth: &DepthIndexColumn,
) -> Vec<&'a SequenceColumn> {
    sequence
        .columns
        .iter()
        .filter(|c| c.external_id != depth.column_external_id)
        .collect()
}

/// Turn mnemonic search results into measurement columns
///
/// `groups` must be aligned with `columns`. Columns without a match are
/// dropped.
pub fn measurement_columns(
    columns: &[&SequenceColumn],
    groups: &[MnemonicMatchGroup],
    find_best_match: FindBestMatch,
) -> Vec<DepthMeasurementColumn> {
    columns
        .iter()
        .zip(groups)
        .filter_map(|(column, group)| {
            let Some(best) = find_best_match(column, &group.matches) else {
                debug!(column = %column.external_id, "No mnemonic match, dropping column");
                return None;
            };
            Some(DepthMeasurementColumn {
                measurement_type: best.measurement_type,
                unit: column.metadata.get("unit").cloned().unwrap_or_default(),
                column_external_id: column.external_id.clone(),
            })
        })
        .collect()
}

/// Map a log sequence to a depth measurement ingestion
///
/// Depth values are scaled by the index unit factor and must be strictly
/// increasing; the first violation rejects the whole series. Rows without a
/// depth are dropped with a warning. Returns `Ok(None)` when there is nothing
/// to write (no measurement columns or no rows).
pub fn map_depth_measurement(
    mapping: &DepthMeasurementMapping,
    wellbore_asset_external_id: &str,
    sequence: &SourceSequence,
    data: &SequenceData,
    depth_column: &DepthIndexColumn,
    columns: Vec<DepthMeasurementColumn>,
) -> Result<Option<DepthMeasurementIngestion>, MappingError> {
    let sequence_external_id = sequence
        .external_id
        .clone()
        .ok_or(MappingError::MissingIdentifier)?;

    if columns.is_empty() {
        warn!(sequence = %sequence_external_id, "No measurement columns were matched");
        return Ok(None);
    }

    let missing = |column: &str| MappingError::MissingColumn {
        sequence: sequence_external_id.clone(),
        column: column.to_string(),
    };
    let depth_index = data
        .column_index(&depth_column.column_external_id)
        .ok_or_else(|| missing(&depth_column.column_external_id))?;
    let value_indices = columns
        .iter()
        .map(|c| {
            data.column_index(&c.column_external_id)
                .ok_or_else(|| missing(&c.column_external_id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let scale = depth_column.unit.scale();
    let mut rows: Vec<DepthMeasurementRow> = Vec::with_capacity(data.rows.len());

    for row in &data.rows {
        let Some(depth) = SequenceData::number(row, depth_index).map(|d| d * scale) else {
            warn!(
                sequence = %sequence_external_id,
                row = row.row_number,
                "Ignoring row without a depth value"
            );
            continue;
        };

        if let Some(previous) = rows.last().map(|r| r.depth) {
            if depth <= previous {
                return Err(MappingError::NonMonotonicDepth {
                    series: sequence_external_id,
                    row: row.row_number,
                    previous,
                    depth,
                });
            }
        }

        rows.push(DepthMeasurementRow {
            depth,
            values: value_indices
                .iter()
                .map(|&i| SequenceData::number(row, i))
                .collect(),
        });
    }

    if rows.is_empty() {
        warn!(sequence = %sequence_external_id, "Can't ingest depth measurement since it has no rows");
        return Ok(None);
    }

    Ok(Some(DepthMeasurementIngestion {
        wellbore_asset_external_id: wellbore_asset_external_id.to_string(),
        source: SequenceSource {
            sequence_external_id,
            source_name: mapping.source_name.clone(),
        },
        // depth values are already scaled
        depth_column: DepthIndexColumn {
            unit: DistanceUnit::new(depth_column.unit.unit),
            ..depth_column.clone()
        },
        columns,
        rows,
    }))
}
