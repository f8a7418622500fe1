//! Length unit parsing
//!
//! Source systems spell units freely (`ft`, `feet`, `0.1 in`, `m rkb`). These
//! helpers normalise them to [`DistanceUnit`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::models::{Distance, DistanceUnit, DistanceUnitEnum};

// Matches '0.1 in' or 'meter' or 'feet' or '23.34 ft'
static UNIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<factor>[+-]?([0-9]*[.])?[0-9]+)?\s*(?P<unit>\w+)$").unwrap()
});

fn unit_by_name(name: &str) -> Option<DistanceUnitEnum> {
    match name {
        "m" | "meter" | "meters" | "metre" | "metres" => Some(DistanceUnitEnum::Meter),
        "in" | "inch" | "inches" => Some(DistanceUnitEnum::Inch),
        "ft" | "foot" | "feet" => Some(DistanceUnitEnum::Foot),
        _ => None,
    }
}

/// Parse a unit string. Returns `None` for anything unrecognised.
pub fn parse_unit(unit: &str) -> Option<DistanceUnit> {
    let unit = unit.trim().to_lowercase();
    match unit.as_str() {
        "mm" => return Some(DistanceUnit::with_factor(DistanceUnitEnum::Meter, 0.001)),
        // meters below rotary kelly bushing
        "m rkb" => return Some(DistanceUnit::new(DistanceUnitEnum::Meter)),
        _ => {}
    }

    let captures = UNIT_REGEX.captures(&unit)?;
    let parsed = unit_by_name(captures.name("unit")?.as_str())?;
    let factor = match captures.name("factor") {
        Some(m) => m.as_str().parse::<f64>().ok()?,
        None => 1.0,
    };

    if factor == 1.0 {
        Some(DistanceUnit::new(parsed))
    } else {
        Some(DistanceUnit::with_factor(parsed, factor))
    }
}

/// Parse a value/unit pair into a [`Distance`]
///
/// Scaled units are not converted; they are logged and dropped.
pub fn parse_distance(value: Option<&str>, unit: Option<&str>) -> Option<Distance> {
    let (value, unit) = (value?, unit?);
    let value = value.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    let parsed = parse_unit(unit)?;

    if parsed.scale() != 1.0 {
        warn!(unit = %unit, "Unit has a factor != 1.0, which isn't handled yet");
        return None;
    }

    Some(Distance {
        value,
        unit: parsed.unit,
    })
}
