//! Field mapping tables
//!
//! Every source key, column name and unit the loaders rely on lives here, so a
//! different source layout is a configuration change. Defaults reproduce the
//! OSDU/EDM layout of the Cognite subsurface project.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{AngleUnitEnum, DistanceUnit, DistanceUnitEnum};

fn filter(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Complete mapping configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub sources: SourceRegistration,
    pub osdu: OsduWellMapping,
    pub edm: EdmWellMapping,
    pub trajectory: TrajectoryMapping,
    pub depth_measurement: DepthMeasurementMapping,
    pub well_top: WellTopMapping,
}

impl MappingConfig {
    /// Load a mapping table from a TOML or YAML file (by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let err = |reason: String| ConfigError::MappingFile {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| err(e.to_string())),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| err(e.to_string())),
            other => Err(err(format!(
                "Unsupported extension '{other}'. Expected .toml, .yaml or .yml"
            ))),
        }
    }
}

/// A source to register in the Well Data Layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    pub name: String,
    pub description: String,
}

/// Sources and their merge priority (first wins)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRegistration {
    pub sources: Vec<SourceDefinition>,
    pub merge_priority: Vec<String>,
}

impl Default for SourceRegistration {
    fn default() -> Self {
        let def = |name: &str, description: &str| SourceDefinition {
            name: name.to_string(),
            description: description.to_string(),
        };
        Self {
            sources: vec![
                def(
                    "OSDU",
                    "The Open Subsurface Data Universe (OSDU) Data Platform",
                ),
                def("EDM", "Engineering Data Management Services"),
                def("DISKOS", "Diskos National Data Repository"),
            ],
            merge_priority: vec!["EDM".to_string(), "OSDU".to_string(), "DISKOS".to_string()],
        }
    }
}

/// OSDU well and wellbore assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsduWellMapping {
    pub source_name: String,
    pub well_filter: BTreeMap<String, String>,
    pub wellbore_filter: BTreeMap<String, String>,
    pub longitude_key: String,
    pub latitude_key: String,
    pub crs: String,
    /// Read from the first child wellbore
    pub operator_key: String,
    pub datum_elevation_key: String,
    pub datum_reference_key: String,
    pub datum_unit: DistanceUnitEnum,
}

impl Default for OsduWellMapping {
    fn default() -> Self {
        Self {
            source_name: "OSDU".to_string(),
            well_filter: filter(&[("FacilityType", "Well")]),
            wellbore_filter: filter(&[("FacilityTypeID", "Wellbore")]),
            longitude_key: "Wgs84SpatialLocationX".to_string(),
            latitude_key: "Wgs84SpatialLocationY".to_string(),
            crs: "EPSG:4326".to_string(),
            operator_key: "CurrentOperator".to_string(),
            datum_elevation_key: "VerticalMeasurement_Measured_From".to_string(),
            datum_reference_key: "VerticalMeasurementType_Measured_From".to_string(),
            datum_unit: DistanceUnitEnum::Meter,
        }
    }
}

/// EDM well, wellbore and datum assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdmWellMapping {
    pub enabled: bool,
    pub source_name: String,
    pub well_filter: BTreeMap<String, String>,
    pub wellbore_filter: BTreeMap<String, String>,
    pub datum_filter: BTreeMap<String, String>,
    pub longitude_key: String,
    pub latitude_key: String,
    pub crs: String,
    pub operator_key: String,
    pub description_key: String,
    pub water_depth_key: String,
    pub water_depth_unit_key: String,
    pub spud_date_key: String,
    pub datum_id_key: String,
    /// Appended to the datum id to form the datum asset external id
    pub datum_suffix: String,
    pub datum_elevation_key: String,
    pub datum_elevation_unit_key: String,
}

impl Default for EdmWellMapping {
    fn default() -> Self {
        Self {
            enabled: true,
            source_name: "EDM".to_string(),
            well_filter: filter(&[("type", "Well")]),
            wellbore_filter: filter(&[("type", "Wellbore")]),
            datum_filter: filter(&[("type", "Datum")]),
            longitude_key: "GEO_LONGITUDE".to_string(),
            latitude_key: "GEO_LATITUDE".to_string(),
            crs: "EPSG:4326".to_string(),
            operator_key: "WELL_OPERATOR".to_string(),
            description_key: "WELL_DESC".to_string(),
            water_depth_key: "WELLHEAD_DEPTH".to_string(),
            water_depth_unit_key: "WELLHEAD_DEPTH_DSDSUNIT".to_string(),
            spud_date_key: "SPUD_DATE".to_string(),
            datum_id_key: "DRILLING_DATUM_ID_EDM".to_string(),
            datum_suffix: "||EDMDF".to_string(),
            datum_elevation_key: "DATUM_ELEVATION".to_string(),
            datum_elevation_unit_key: "DATUM_ELEVATION_DSDUNIT".to_string(),
        }
    }
}

/// Trajectory sequences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryMapping {
    pub sequence_description: String,
    pub source_name: String,
    pub measured_depth_column: String,
    pub measured_depth_unit: DistanceUnit,
    pub inclination_column: String,
    pub inclination_unit: AngleUnitEnum,
    pub azimuth_column: String,
    pub azimuth_unit: AngleUnitEnum,
    pub true_vertical_depth_column: Option<String>,
    pub northing_column: Option<String>,
    pub easting_column: Option<String>,
    pub is_definitive: bool,
}

impl Default for TrajectoryMapping {
    fn default() -> Self {
        Self {
            sequence_description: "Wellbore Trajectory".to_string(),
            source_name: "OSDU".to_string(),
            measured_depth_column: "MeasuredDepth".to_string(),
            measured_depth_unit: DistanceUnit::new(DistanceUnitEnum::Foot),
            inclination_column: "Inclination".to_string(),
            inclination_unit: AngleUnitEnum::Degree,
            azimuth_column: "Azimuth".to_string(),
            azimuth_unit: AngleUnitEnum::Degree,
            true_vertical_depth_column: None,
            northing_column: None,
            easting_column: None,
            is_definitive: true,
        }
    }
}

/// Depth-indexed log sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthMeasurementMapping {
    pub sequence_description: String,
    pub source_name: String,
    /// Column ids recognised as the depth index (case-insensitive)
    pub depth_column_ids: Vec<String>,
    pub depth_type: String,
}

impl Default for DepthMeasurementMapping {
    fn default() -> Self {
        Self {
            sequence_description: "Wellbore Log".to_string(),
            source_name: "OSDU".to_string(),
            depth_column_ids: ["md", "tdep", "depth", "dept"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            depth_type: "measured depth".to_string(),
        }
    }
}

/// Well top (marker) sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellTopMapping {
    pub sequence_description: String,
    pub source_name: String,
    pub name_column: String,
    pub top_column: String,
    pub base_column: String,
    pub measured_depth_unit: DistanceUnitEnum,
}

impl Default for WellTopMapping {
    fn default() -> Self {
        Self {
            sequence_description: "Wellbore Marker".to_string(),
            source_name: "OSDU".to_string(),
            name_column: "STRAT_UNIT_NM".to_string(),
            top_column: "TOP_MD".to_string(),
            base_column: "BASE_MD".to_string(),
            measured_depth_unit: DistanceUnitEnum::Meter,
        }
    }
}
