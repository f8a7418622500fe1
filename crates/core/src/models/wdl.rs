//! Well Data Layer ingestion and listing types
//!
//! Field names follow the WDL JSON schema (camelCase on the wire).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reference to the source asset a well or wellbore came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSource {
    pub asset_external_id: String,
    pub source_name: String,
}

/// Reference to the source sequence a child entity came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceSource {
    pub sequence_external_id: String,
    pub source_name: String,
}

/// Length units understood by the Well Data Layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnitEnum {
    Meter,
    Foot,
    Inch,
}

impl std::fmt::Display for DistanceUnitEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceUnitEnum::Meter => write!(f, "meter"),
            DistanceUnitEnum::Foot => write!(f, "foot"),
            DistanceUnitEnum::Inch => write!(f, "inch"),
        }
    }
}

/// Angle units understood by the Well Data Layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnitEnum {
    Degree,
    Radian,
}

/// A length unit with an optional scale factor (`0.1 in` is inch with factor 0.1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceUnit {
    pub unit: DistanceUnitEnum,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}

impl DistanceUnit {
    /// Unit without a factor
    pub fn new(unit: DistanceUnitEnum) -> Self {
        Self { unit, factor: None }
    }

    /// Unit with a scale factor
    pub fn with_factor(unit: DistanceUnitEnum, factor: f64) -> Self {
        Self {
            unit,
            factor: Some(factor),
        }
    }

    /// Effective factor (1.0 when unset)
    pub fn scale(&self) -> f64 {
        self.factor.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnitEnum,
}

/// Elevation of the depth reference point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub value: f64,
    pub unit: DistanceUnitEnum,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wellhead {
    pub x: f64,
    pub y: f64,
    pub crs: String,
}

/// Upsert payload for a well, keyed by `matching_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellIngestion {
    pub matching_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: AssetSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wellhead: Option<Wellhead>,
    /// Usually production or exploration
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub well_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_depth: Option<Distance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spud_date: Option<NaiveDate>,
}

/// Upsert payload for a wellbore, keyed by `matching_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellboreIngestion {
    pub matching_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub well_asset_external_id: String,
    pub source: AssetSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<Datum>,
}

/// One survey station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryIngestionRow {
    pub measured_depth: f64,
    pub inclination: f64,
    pub azimuth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_vertical_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub northing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easting: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryIngestion {
    pub wellbore_asset_external_id: String,
    pub source: SequenceSource,
    pub measured_depth_unit: DistanceUnitEnum,
    pub inclination_unit: AngleUnitEnum,
    pub azimuth_unit: AngleUnitEnum,
    pub is_definitive: bool,
    pub rows: Vec<TrajectoryIngestionRow>,
}

/// Depth index of a measurement series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthIndexColumn {
    pub column_external_id: String,
    pub unit: DistanceUnit,
    /// e.g. `measured depth`
    #[serde(rename = "type")]
    pub depth_type: String,
}

/// A measurement column resolved through the mnemonic search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthMeasurementColumn {
    pub measurement_type: String,
    pub unit: String,
    pub column_external_id: String,
}

/// One depth-indexed row; `values` align with the measurement columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthMeasurementRow {
    pub depth: f64,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthMeasurementIngestion {
    pub wellbore_asset_external_id: String,
    pub source: SequenceSource,
    pub depth_column: DepthIndexColumn,
    pub columns: Vec<DepthMeasurementColumn>,
    pub rows: Vec<DepthMeasurementRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LithostratigraphicLevelEnum {
    Formation,
    Group,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lithostratigraphic {
    pub level: LithostratigraphicLevelEnum,
}

/// A single named top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellTopSurfaceIngestion {
    pub name: String,
    pub top_measured_depth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_measured_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lithostratigraphic: Option<Lithostratigraphic>,
}

/// All tops of one wellbore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellTopsIngestion {
    pub wellbore_asset_external_id: String,
    pub source: SequenceSource,
    pub measured_depth_unit: DistanceUnitEnum,
    pub tops: Vec<WellTopSurfaceIngestion>,
}

/// A wellbore as listed by the Well Data Layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wellbore {
    pub matching_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub well_matching_id: Option<String>,
    #[serde(default)]
    pub sources: Vec<AssetSource>,
}

/// Well tops as listed by the Well Data Layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellTops {
    #[serde(default)]
    pub wellbore_matching_id: Option<String>,
    pub source: SequenceSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MnemonicMatch {
    pub measurement_type: String,
    #[serde(default)]
    pub primary_quantity_class: Option<String>,
}

/// Matches for one searched mnemonic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnemonicMatchGroup {
    pub mnemonic: String,
    #[serde(default)]
    pub matches: Vec<MnemonicMatch>,
}
