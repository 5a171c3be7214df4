//! Distance units and their conversion factors.
//!
//! All conversions go through meters with exact `Decimal` factors:
//! 1 km = 1000 m, 1 mi = 1609.34 m (and therefore 1 mi = 1.60934 km).

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A unit a [`crate::Distance`] can be expressed in.
///
/// The serde wire names (`"m"`, `"km"`, `"mi"`) match the strings used in
/// the rates file and in serialized distance parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "m")]
    Meters,
    #[default]
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
}

impl DistanceUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }

    /// Meters contained in one of this unit, as an exact decimal.
    #[must_use]
    pub(crate) fn meters_per_unit(self) -> Decimal {
        match self {
            DistanceUnit::Meters => Decimal::ONE,
            DistanceUnit::Kilometers => Decimal::new(1000, 0),
            // 1609.34
            DistanceUnit::Miles => Decimal::new(160_934, 2),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(DistanceUnit::Meters),
            "km" => Ok(DistanceUnit::Kilometers),
            "mi" => Ok(DistanceUnit::Miles),
            other => Err(CoreError::InvalidArgument {
                what: "distance unit",
                reason: format!("unrecognized unit '{other}' (expected m, km, or mi)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_units() {
        assert_eq!("m".parse::<DistanceUnit>().unwrap(), DistanceUnit::Meters);
        assert_eq!(
            "km".parse::<DistanceUnit>().unwrap(),
            DistanceUnit::Kilometers
        );
        assert_eq!("mi".parse::<DistanceUnit>().unwrap(), DistanceUnit::Miles);
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = "nope".parse::<DistanceUnit>().unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidArgument { what: "distance unit", .. }),
            "expected InvalidArgument, got: {err:?}"
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for unit in [
            DistanceUnit::Meters,
            DistanceUnit::Kilometers,
            DistanceUnit::Miles,
        ] {
            assert_eq!(unit.to_string().parse::<DistanceUnit>().unwrap(), unit);
        }
    }
}
