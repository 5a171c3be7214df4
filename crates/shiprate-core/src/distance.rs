//! An immutable distance measurement with presentation toggles.
//!
//! The stored `(value, unit)` pair never changes after construction.
//! `ceiling` and `formatter` only affect how converted values are *read*;
//! [`Distance::to_parts`] always reproduces the original pair exactly.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::units::DistanceUnit;

/// Formats a converted distance value for display.
///
/// A plain function pointer so [`Distance`] stays `Clone` and `Debug`.
pub type DistanceFormatter = fn(Decimal) -> String;

/// A distance measurement fixed at construction time.
#[derive(Debug, Clone)]
pub struct Distance {
    value: Decimal,
    unit: DistanceUnit,
    ceiling: bool,
    formatter: Option<DistanceFormatter>,
}

/// Serializable `(number, unit)` snapshot of a [`Distance`].
///
/// Round-trips exactly: the number string is the stored value, not a
/// derived conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceParts {
    pub number: String,
    pub unit: String,
}

impl Distance {
    /// Wraps an already-parsed value. Providers use this for distances
    /// extracted from API responses.
    #[must_use]
    pub fn new(value: Decimal, unit: DistanceUnit) -> Self {
        Self {
            value,
            unit,
            ceiling: false,
            formatter: None,
        }
    }

    /// Parses a decimal string as a distance in meters.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `number` is not a valid
    /// decimal string.
    pub fn from_meters(number: &str) -> Result<Self, CoreError> {
        Self::from_number(number, DistanceUnit::Meters)
    }

    /// Parses a decimal string as a distance in kilometers.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `number` is not a valid
    /// decimal string.
    pub fn from_kilometers(number: &str) -> Result<Self, CoreError> {
        Self::from_number(number, DistanceUnit::Kilometers)
    }

    /// Parses a decimal string as a distance in miles.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `number` is not a valid
    /// decimal string.
    pub fn from_miles(number: &str) -> Result<Self, CoreError> {
        Self::from_number(number, DistanceUnit::Miles)
    }

    fn from_number(number: &str, unit: DistanceUnit) -> Result<Self, CoreError> {
        let value = Decimal::from_str(number).map_err(|e| CoreError::InvalidArgument {
            what: "distance number",
            reason: format!("'{number}' is not a decimal number: {e}"),
        })?;
        Ok(Self::new(value, unit))
    }

    /// Reconstructs a distance from serialized parts.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if the unit string is not one
    /// of `m`/`km`/`mi` or the number does not parse.
    pub fn from_parts(parts: &DistanceParts) -> Result<Self, CoreError> {
        let unit = parts.unit.parse::<DistanceUnit>()?;
        Self::from_number(&parts.number, unit)
    }

    /// Snapshot of the original `(number, unit)` pair.
    #[must_use]
    pub fn to_parts(&self) -> DistanceParts {
        DistanceParts {
            number: self.value.to_string(),
            unit: self.unit.as_str().to_owned(),
        }
    }

    /// When enabled, converted values are rounded up to the next whole
    /// number before formatting. The stored value is untouched.
    pub fn set_ceiling(&mut self, ceiling: bool) {
        self.ceiling = ceiling;
    }

    pub fn set_formatter(&mut self, formatter: DistanceFormatter) {
        self.formatter = Some(formatter);
    }

    #[must_use]
    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// The converted numeric value in `unit`, normalized, with the ceiling
    /// toggle applied. Pure in `(value, unit)`.
    #[must_use]
    pub fn value_in(&self, unit: DistanceUnit) -> Decimal {
        let converted = if unit == self.unit {
            self.value
        } else {
            self.value * self.unit.meters_per_unit() / unit.meters_per_unit()
        };
        let converted = converted.normalize();
        if self.ceiling {
            converted.ceil()
        } else {
            converted
        }
    }

    /// The converted value in `unit`, formatted with the configured
    /// formatter (falling back to plain decimal display).
    #[must_use]
    pub fn in_unit(&self, unit: DistanceUnit) -> String {
        let value = self.value_in(unit);
        match self.formatter {
            Some(format) => format(value),
            None => value.to_string(),
        }
    }

    #[must_use]
    pub fn in_meters(&self) -> String {
        self.in_unit(DistanceUnit::Meters)
    }

    #[must_use]
    pub fn in_kilometers(&self) -> String {
        self.in_unit(DistanceUnit::Kilometers)
    }

    #[must_use]
    pub fn in_miles(&self) -> String {
        self.in_unit(DistanceUnit::Miles)
    }
}
