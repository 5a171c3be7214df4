//! Origin/destination places in one of three mutually exclusive forms.
//!
//! Constructors validate their input and return `Err` instead of building a
//! half-valid value, so every `Location` in circulation is usable. Accessors
//! for the wrong variant fail with [`CoreError::TypeMismatch`].

use std::collections::HashMap;
use std::fmt;

use crate::error::CoreError;

/// Discriminant of a [`Location`] variant, for dispatch and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Address,
    Components,
    Coordinates,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKind::Address => write!(f, "an address string"),
            LocationKind::Components => write!(f, "address components"),
            LocationKind::Coordinates => write!(f, "a coordinate pair"),
        }
    }
}

/// Normalized subset of a structured postal address.
///
/// Only the allow-listed fields survive normalization; everything else in
/// the source map is dropped. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressComponents {
    pub address_1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl AddressComponents {
    fn from_map(fields: &HashMap<String, String>) -> Self {
        let pick = |key: &str| {
            fields
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        Self {
            // Legacy payloads carry the street line under "address".
            address_1: pick("address_1").or_else(|| pick("address")),
            city: pick("city"),
            state: pick("state"),
            postcode: pick("postcode"),
            country: pick("country"),
        }
    }

    fn is_empty(&self) -> bool {
        self.address_1.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.postcode.is_none()
            && self.country.is_none()
    }

    /// Single-line rendering for providers that take a free-form address.
    #[must_use]
    pub fn formatted(&self) -> String {
        [
            &self.address_1,
            &self.city,
            &self.state,
            &self.postcode,
            &self.country,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A place, fixed to exactly one representation at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Address(String),
    Components(AddressComponents),
    Coordinates { lat: f64, lng: f64 },
}

impl Location {
    /// Builds an address-string location.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if the address is empty after
    /// trimming.
    pub fn from_address(address: &str) -> Result<Self, CoreError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidArgument {
                what: "address",
                reason: "address string is empty".to_owned(),
            });
        }
        Ok(Location::Address(trimmed.to_owned()))
    }

    /// Builds a location from a structured address map, keeping only the
    /// normalized component allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if no allow-listed field has a
    /// non-empty value.
    pub fn from_components(fields: &HashMap<String, String>) -> Result<Self, CoreError> {
        let components = AddressComponents::from_map(fields);
        if components.is_empty() {
            return Err(CoreError::InvalidArgument {
                what: "address components",
                reason: "all address component fields are empty".to_owned(),
            });
        }
        Ok(Location::Components(components))
    }

    /// Builds a coordinate location.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `lat` is outside [-90, 90]
    /// or `lng` is outside [-180, 180] (NaN fails both).
    pub fn from_coordinates(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::InvalidArgument {
                what: "latitude",
                reason: format!("{lat} is outside [-90, 90]"),
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::InvalidArgument {
                what: "longitude",
                reason: format!("{lng} is outside [-180, 180]"),
            });
        }
        Ok(Location::Coordinates { lat, lng })
    }

    #[must_use]
    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Address(_) => LocationKind::Address,
            Location::Components(_) => LocationKind::Components,
            Location::Coordinates { .. } => LocationKind::Coordinates,
        }
    }

    /// The address string of an [`Location::Address`] location.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TypeMismatch`] for any other variant.
    pub fn address(&self) -> Result<&str, CoreError> {
        match self {
            Location::Address(s) => Ok(s),
            other => Err(CoreError::TypeMismatch {
                expected: LocationKind::Address,
                actual: other.kind(),
            }),
        }
    }

    /// The components of a [`Location::Components`] location.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TypeMismatch`] for any other variant.
    pub fn components(&self) -> Result<&AddressComponents, CoreError> {
        match self {
            Location::Components(c) => Ok(c),
            other => Err(CoreError::TypeMismatch {
                expected: LocationKind::Components,
                actual: other.kind(),
            }),
        }
    }

    /// The `(lat, lng)` pair of a [`Location::Coordinates`] location.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TypeMismatch`] for any other variant.
    pub fn coordinates(&self) -> Result<(f64, f64), CoreError> {
        match self {
            Location::Coordinates { lat, lng } => Ok((*lat, *lng)),
            other => Err(CoreError::TypeMismatch {
                expected: LocationKind::Coordinates,
                actual: other.kind(),
            }),
        }
    }

    /// Free-form text rendering, usable as a geocoding query or an
    /// address parameter regardless of variant.
    #[must_use]
    pub fn to_query_text(&self) -> String {
        match self {
            Location::Address(s) => s.clone(),
            Location::Components(c) => c.formatted(),
            Location::Coordinates { lat, lng } => format!("{lat},{lng}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn coordinates_location_rejects_address_accessor() {
        let loc = Location::from_coordinates(-6.1754, 106.8272).unwrap();
        let err = loc.address().unwrap_err();
        assert!(
            matches!(
                err,
                CoreError::TypeMismatch {
                    expected: LocationKind::Address,
                    actual: LocationKind::Coordinates,
                }
            ),
            "expected TypeMismatch, got: {err:?}"
        );
        assert_eq!(loc.coordinates().unwrap(), (-6.1754, 106.8272));
    }

    #[test]
    fn address_location_rejects_coordinates_accessor() {
        let loc = Location::from_address("Jl. Medan Merdeka Barat 12").unwrap();
        assert!(loc.coordinates().is_err());
        assert_eq!(loc.address().unwrap(), "Jl. Medan Merdeka Barat 12");
    }

    #[test]
    fn empty_address_is_rejected() {
        let err = Location::from_address("   ").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidArgument { what: "address", .. }
        ));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        assert!(Location::from_coordinates(91.0, 0.0).is_err());
        assert!(Location::from_coordinates(-91.0, 0.0).is_err());
        assert!(Location::from_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        assert!(Location::from_coordinates(0.0, 181.0).is_err());
        assert!(Location::from_coordinates(0.0, -180.5).is_err());
    }

    #[test]
    fn components_keep_only_the_allow_list() {
        let loc = Location::from_components(&component_map(&[
            ("address_1", "Jl. Thamrin 1"),
            ("city", "Jakarta"),
            ("company", "Acme"),
            ("phone", "555"),
        ]))
        .unwrap();
        let components = loc.components().unwrap();
        assert_eq!(components.address_1.as_deref(), Some("Jl. Thamrin 1"));
        assert_eq!(components.city.as_deref(), Some("Jakarta"));
        assert!(components.state.is_none());
    }

    #[test]
    fn legacy_address_key_fills_address_1() {
        let loc = Location::from_components(&component_map(&[
            ("address", "Jl. Sudirman 5"),
            ("country", "ID"),
        ]))
        .unwrap();
        assert_eq!(
            loc.components().unwrap().address_1.as_deref(),
            Some("Jl. Sudirman 5")
        );
    }

    #[test]
    fn all_empty_components_are_rejected() {
        let err =
            Location::from_components(&component_map(&[("city", "  "), ("notes", "x")]))
                .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidArgument {
                what: "address components",
                ..
            }
        ));
    }

    #[test]
    fn formatted_joins_non_empty_fields() {
        let loc = Location::from_components(&component_map(&[
            ("address_1", "Jl. Thamrin 1"),
            ("city", "Jakarta"),
            ("country", "ID"),
        ]))
        .unwrap();
        assert_eq!(
            loc.components().unwrap().formatted(),
            "Jl. Thamrin 1, Jakarta, ID"
        );
    }

    #[test]
    fn query_text_for_each_variant() {
        let address = Location::from_address("Monas, Jakarta").unwrap();
        assert_eq!(address.to_query_text(), "Monas, Jakarta");

        let coords = Location::from_coordinates(-6.1754, 106.8272).unwrap();
        assert_eq!(coords.to_query_text(), "-6.1754,106.8272");
    }
}
