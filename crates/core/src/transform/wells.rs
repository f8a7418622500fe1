//! Well and wellbore mapping for OSDU and EDM assets

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use super::clean_name;
use super::units::parse_unit;
use crate::config::{EdmWellMapping, OsduWellMapping};
use crate::error::MappingError;
use crate::models::{
    AssetSource, Datum, Distance, SourceAsset, WellIngestion, WellboreIngestion, Wellhead,
};

/// Identifier used for reporting a source asset
pub fn record_id(asset: &SourceAsset) -> String {
    asset
        .identifier()
        .map(str::to_string)
        .unwrap_or_else(|| format!("asset #{}", asset.id))
}

/// Result of mapping one batch of well and wellbore assets
#[derive(Debug, Default, Clone)]
pub struct MappedWells {
    pub wells: Vec<WellIngestion>,
    pub wellbores: Vec<WellboreIngestion>,
    /// Skipped wells with the reason, keyed by source id
    pub skipped_wells: Vec<(String, MappingError)>,
    /// Skipped wellbores with the reason, keyed by source id
    pub skipped_wellbores: Vec<(String, MappingError)>,
}

/// Source-specific well fields
struct WellFields {
    description: Option<String>,
    operator: Option<String>,
    water_depth: Option<Distance>,
    spud_date: Option<NaiveDate>,
}

/// Shared skeleton of both well mappers: identifier and name checks, optional
/// matching id dedup, parent lookup for wellbores.
struct WellAssembler<'a> {
    source_name: &'a str,
    crs: &'a str,
    longitude_key: &'a str,
    latitude_key: &'a str,
    /// Matching ids already produced; `None` disables dedup
    seen_matching_ids: Option<&'a mut HashSet<String>>,
    out: MappedWells,
}

impl WellAssembler<'_> {
    fn well(
        &mut self,
        asset: &SourceAsset,
        fields: impl FnOnce(&str) -> WellFields,
    ) -> Result<(), MappingError> {
        let external_id = asset.identifier().ok_or(MappingError::MissingIdentifier)?;
        let name = clean_name(&asset.name);
        if name.is_empty() {
            return Err(MappingError::MissingField {
                record: external_id.to_string(),
                field: "name".to_string(),
            });
        }
        if let Some(seen) = self.seen_matching_ids.as_deref_mut() {
            if !seen.insert(name.clone()) {
                return Err(MappingError::Duplicate(name));
            }
        }

        let fields = fields(&name);
        self.out.wells.push(WellIngestion {
            matching_id: name.clone(),
            name,
            description: fields.description,
            source: AssetSource {
                asset_external_id: external_id.to_string(),
                source_name: self.source_name.to_string(),
            },
            wellhead: wellhead(asset, self.longitude_key, self.latitude_key, self.crs),
            well_type: None,
            water_depth: fields.water_depth,
            operator: fields.operator,
            spud_date: fields.spud_date,
        });
        Ok(())
    }

    fn wellbore(
        &mut self,
        asset: &SourceAsset,
        well_external_id: &str,
        datum: Option<Datum>,
    ) -> Result<(), MappingError> {
        let external_id = asset.identifier().ok_or(MappingError::MissingIdentifier)?;
        let name = clean_name(&asset.name);
        if name.is_empty() {
            return Err(MappingError::MissingField {
                record: external_id.to_string(),
                field: "name".to_string(),
            });
        }

        self.out.wellbores.push(WellboreIngestion {
            matching_id: clean_name(external_id),
            description: Some(name.clone()),
            name,
            well_asset_external_id: well_external_id.to_string(),
            source: AssetSource {
                asset_external_id: external_id.to_string(),
                source_name: self.source_name.to_string(),
            },
            datum,
        });
        Ok(())
    }

    fn skip_well(&mut self, asset: &SourceAsset, reason: MappingError) {
        warn!(record = %record_id(asset), reason = %reason, "Skipping well");
        self.out.skipped_wells.push((record_id(asset), reason));
    }

    fn skip_wellbore(&mut self, asset: &SourceAsset, reason: MappingError) {
        warn!(record = %record_id(asset), reason = %reason, "Skipping wellbore");
        self.out.skipped_wellbores.push((record_id(asset), reason));
    }

    /// Skip wellbores whose parent never made it into `wells`
    fn skip_orphans(&mut self, wellbores: &[SourceAsset], handled: &[bool]) {
        for (wb, _) in wellbores.iter().zip(handled).filter(|(_, done)| !**done) {
            let reason = match wb.parent_external_id.as_deref() {
                Some(parent) if !parent.trim().is_empty() => MappingError::UnknownParent {
                    record: record_id(wb),
                    parent: parent.to_string(),
                },
                _ => MappingError::MissingField {
                    record: record_id(wb),
                    field: "parent_external_id".to_string(),
                },
            };
            self.skip_wellbore(wb, reason);
        }
    }
}

/// Wellbore positions grouped by parent external id
fn group_by_parent(wellbores: &[SourceAsset]) -> HashMap<&str, Vec<usize>> {
    let mut by_parent: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, wb) in wellbores.iter().enumerate() {
        if let Some(parent) = wb.parent_external_id.as_deref() {
            by_parent.entry(parent).or_default().push(idx);
        }
    }
    by_parent
}

fn parse_coordinate(asset: &SourceAsset, key: &str) -> Option<f64> {
    let raw = asset.meta(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(record = %record_id(asset), key, value = raw, "Coordinate is not a number");
            None
        }
    }
}

fn wellhead(asset: &SourceAsset, longitude_key: &str, latitude_key: &str, crs: &str) -> Option<Wellhead> {
    let x = parse_coordinate(asset, longitude_key);
    let y = parse_coordinate(asset, latitude_key);
    match (x, y) {
        (Some(x), Some(y)) => Some(Wellhead {
            x,
            y,
            crs: crs.to_string(),
        }),
        (None, None) => None,
        _ => {
            warn!(record = %record_id(asset), "Wellhead has only one coordinate, ignoring it");
            None
        }
    }
}

/// Map OSDU well and wellbore assets
///
/// Every well with an identifier and a name is mapped, including wells whose
/// cleaned names collide; the Well Data Layer merges them by matching id.
pub fn map_osdu_wells(
    mapping: &OsduWellMapping,
    well_assets: &[SourceAsset],
    wellbore_assets: &[SourceAsset],
) -> MappedWells {
    let by_parent = group_by_parent(wellbore_assets);
    let mut handled = vec![false; wellbore_assets.len()];
    let mut asm = WellAssembler {
        source_name: &mapping.source_name,
        crs: &mapping.crs,
        longitude_key: &mapping.longitude_key,
        latitude_key: &mapping.latitude_key,
        seen_matching_ids: None,
        out: MappedWells::default(),
    };

    for well in well_assets {
        let children: &[usize] = well
            .identifier()
            .and_then(|id| by_parent.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let operator = children
            .first()
            .and_then(|&idx| wellbore_assets[idx].meta(&mapping.operator_key))
            .map(str::to_string);

        let result = asm.well(well, |name| WellFields {
            description: Some(name.to_string()),
            operator,
            water_depth: None,
            spud_date: None,
        });
        if let Err(reason) = result {
            asm.skip_well(well, reason);
            continue;
        }

        let well_id = record_id(well);
        for &idx in children {
            handled[idx] = true;
            let wb = &wellbore_assets[idx];
            let datum = osdu_datum(mapping, wb);
            if let Err(reason) = asm.wellbore(wb, &well_id, datum) {
                asm.skip_wellbore(wb, reason);
            }
        }
    }

    asm.skip_orphans(wellbore_assets, &handled);
    debug!(
        wells = asm.out.wells.len(),
        wellbores = asm.out.wellbores.len(),
        "Mapped OSDU assets"
    );
    asm.out
}

fn osdu_datum(mapping: &OsduWellMapping, wellbore: &SourceAsset) -> Option<Datum> {
    let elevation = wellbore.meta(&mapping.datum_elevation_key)?;
    let reference = wellbore.meta(&mapping.datum_reference_key)?;
    match elevation.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(Datum {
            value,
            unit: mapping.datum_unit,
            reference: reference.to_string(),
        }),
        _ => {
            warn!(record = %record_id(wellbore), value = elevation, "Datum elevation is not a number");
            None
        }
    }
}

/// Map EDM well, wellbore and datum assets
///
/// `seen_matching_ids` holds the matching ids produced so far from this
/// source; a well whose cleaned name is already in it is skipped as a
/// duplicate together with its wellbores.
pub fn map_edm_wells(
    mapping: &EdmWellMapping,
    well_assets: &[SourceAsset],
    wellbore_assets: &[SourceAsset],
    datum_assets: &[SourceAsset],
    seen_matching_ids: &mut HashSet<String>,
) -> MappedWells {
    let by_parent = group_by_parent(wellbore_assets);
    let datums: HashMap<&str, &SourceAsset> = datum_assets
        .iter()
        .filter_map(|d| d.identifier().map(|id| (id, d)))
        .collect();
    let mut handled = vec![false; wellbore_assets.len()];
    let mut asm = WellAssembler {
        source_name: &mapping.source_name,
        crs: &mapping.crs,
        longitude_key: &mapping.longitude_key,
        latitude_key: &mapping.latitude_key,
        seen_matching_ids: Some(seen_matching_ids),
        out: MappedWells::default(),
    };

    for well in well_assets {
        let children: &[usize] = well
            .identifier()
            .and_then(|id| by_parent.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let result = asm.well(well, |_| WellFields {
            description: well.meta(&mapping.description_key).map(str::to_string),
            operator: well.meta(&mapping.operator_key).map(str::to_string),
            water_depth: edm_water_depth(mapping, well),
            spud_date: edm_spud_date(mapping, well),
        });
        if let Err(reason) = result {
            asm.skip_well(well, reason);
            continue;
        }

        let well_id = record_id(well);
        for &idx in children {
            handled[idx] = true;
            let wb = &wellbore_assets[idx];
            let datum = edm_datum(mapping, wb, &datums);
            if let Err(reason) = asm.wellbore(wb, &well_id, datum) {
                asm.skip_wellbore(wb, reason);
            }
        }
    }

    asm.skip_orphans(wellbore_assets, &handled);
    debug!(
        wells = asm.out.wells.len(),
        wellbores = asm.out.wellbores.len(),
        "Mapped EDM assets"
    );
    asm.out
}

fn edm_water_depth(mapping: &EdmWellMapping, well: &SourceAsset) -> Option<Distance> {
    let raw = well.meta(&mapping.water_depth_key)?;
    let value = match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn!(
                record = %record_id(well),
                value = raw,
                "Couldn't parse water depth as a floating point value"
            );
            return None;
        }
    };

    let unit = well.meta(&mapping.water_depth_unit_key)?;
    let parsed = parse_unit(unit)?;
    if parsed.scale() != 1.0 {
        warn!(unit, "Unit has a factor != 1.0, which isn't handled yet");
        return None;
    }

    Some(Distance {
        value,
        unit: parsed.unit,
    })
}

/// Parse an ISO-8601 date or date-time
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

fn edm_spud_date(mapping: &EdmWellMapping, well: &SourceAsset) -> Option<NaiveDate> {
    let raw = well.meta(&mapping.spud_date_key)?;
    let date = parse_iso_date(raw);
    if date.is_none() {
        warn!(record = %record_id(well), value = raw, "Spud date is not a datetime");
    }
    date
}

fn edm_datum(
    mapping: &EdmWellMapping,
    wellbore: &SourceAsset,
    datums: &HashMap<&str, &SourceAsset>,
) -> Option<Datum> {
    let key = wellbore.meta(&mapping.datum_id_key)?;
    let datum = datums.get(format!("{key}{}", mapping.datum_suffix).as_str())?;
    let distance = super::units::parse_distance(
        datum.meta(&mapping.datum_elevation_key),
        datum.meta(&mapping.datum_elevation_unit_key),
    )?;
    Some(Datum {
        value: distance.value,
        unit: distance.unit,
        reference: key.to_string(),
    })
}
