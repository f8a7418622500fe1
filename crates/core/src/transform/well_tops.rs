//! Well top (marker) mapping

use std::collections::HashMap;

use tracing::warn;

use crate::config::WellTopMapping;
use crate::error::MappingError;
use crate::models::{
    Lithostratigraphic, LithostratigraphicLevelEnum, SequenceData, SequenceSource,
    SourceSequence, WellTopSurfaceIngestion, WellTopsIngestion,
};

/// Lithostratigraphic level implied by a top name
pub fn lithostratigraphic_level(name: &str) -> Option<Lithostratigraphic> {
    let lower = name.to_lowercase();
    let level = if lower.contains("formation") {
        LithostratigraphicLevelEnum::Formation
    } else if lower.contains("group") {
        LithostratigraphicLevelEnum::Group
    } else if lower.contains("member") {
        LithostratigraphicLevelEnum::Member
    } else {
        return None;
    };
    Some(Lithostratigraphic { level })
}

/// Tops collected for one wellbore, deduplicated by name
#[derive(Debug, Default)]
struct TopSet {
    tops: Vec<WellTopSurfaceIngestion>,
    by_name: HashMap<String, usize>,
}

impl TopSet {
    fn insert(&mut self, sequence: &str, top: WellTopSurfaceIngestion) {
        match self.by_name.get(&top.name) {
            Some(&idx) => {
                warn!(
                    sequence,
                    name = %top.name,
                    "Duplicate top name, keeping the last value"
                );
                self.tops[idx] = top;
            }
            None => {
                self.by_name.insert(top.name.clone(), self.tops.len());
                self.tops.push(top);
            }
        }
    }
}

/// Map all marker sequences of one wellbore to a single well tops ingestion
///
/// The first sequence is recorded as the source. Rows without a name or with
/// a missing top depth are ignored with a warning. A missing base depth is
/// left out. Returns `Ok(None)` when no top survives.
pub fn map_well_tops(
    mapping: &WellTopMapping,
    wellbore_asset_external_id: &str,
    sequences: &[(&SourceSequence, &SequenceData)],
) -> Result<Option<WellTopsIngestion>, MappingError> {
    let Some((first, _)) = sequences.first() else {
        return Ok(None);
    };
    let source_sequence = first
        .external_id
        .clone()
        .ok_or(MappingError::MissingIdentifier)?;

    let mut set = TopSet::default();
    for (sequence, data) in sequences {
        let seq_id = sequence.display_id();
        let column = |name: &str| {
            data.column_index(name)
                .ok_or_else(|| MappingError::MissingColumn {
                    sequence: seq_id.clone(),
                    column: name.to_string(),
                })
        };
        let name_index = column(&mapping.name_column)?;
        let top_index = column(&mapping.top_column)?;
        let base_index = data.column_index(&mapping.base_column);

        for row in &data.rows {
            let Some(name) = SequenceData::text(row, name_index) else {
                warn!(sequence = %seq_id, row = row.row_number, "Ignoring top without a name");
                continue;
            };
            let Some(top_measured_depth) = SequenceData::number(row, top_index) else {
                warn!(
                    sequence = %seq_id,
                    "top '{name}' has top_measured_depth set to NaN and is therefore ignored"
                );
                continue;
            };

            set.insert(
                &seq_id,
                WellTopSurfaceIngestion {
                    lithostratigraphic: lithostratigraphic_level(&name),
                    name,
                    top_measured_depth,
                    base_measured_depth: base_index.and_then(|i| SequenceData::number(row, i)),
                },
            );
        }
    }

    if set.tops.is_empty() {
        warn!(wellbore = wellbore_asset_external_id, "No well tops to ingest");
        return Ok(None);
    }

    Ok(Some(WellTopsIngestion {
        wellbore_asset_external_id: wellbore_asset_external_id.to_string(),
        source: SequenceSource {
            sequence_external_id: source_sequence,
            source_name: mapping.source_name.clone(),
        },
        measured_depth_unit: mapping.measured_depth_unit,
        tops: set.tops,
    }))
}
