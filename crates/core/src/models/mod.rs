//! Data model
//!
//! - [`source`]: records read from the source system
//! - [`wdl`]: payloads written to and listings read from the Well Data Layer

pub mod source;
pub mod wdl;

pub use source::{
    AssetFilter, SequenceColumn, SequenceData, SequenceRow, SourceAsset, SourceSequence,
};
pub use wdl::{
    AngleUnitEnum, AssetSource, Datum, DepthIndexColumn, DepthMeasurementColumn,
    DepthMeasurementIngestion, DepthMeasurementRow, Distance, DistanceUnit, DistanceUnitEnum,
    Lithostratigraphic, LithostratigraphicLevelEnum, MnemonicMatch, MnemonicMatchGroup, Source,
    SequenceSource, TrajectoryIngestion, TrajectoryIngestionRow, WellIngestion,
    WellTopSurfaceIngestion, WellTops, WellTopsIngestion, Wellbore, WellboreIngestion, Wellhead,
};
