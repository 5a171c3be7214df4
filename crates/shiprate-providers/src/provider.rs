//! The pluggable distance-provider abstraction.

use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use shiprate_core::{Distance, DistanceUnit, Location};

use crate::dispatch::Dispatcher;
use crate::fields::{collect_field_errors, FieldError, ProviderSettings, SettingsField};
use crate::result::CalcResult;

/// Fixed reference route used by the settings-validation probe
/// (Monas to Jakarta City Hall).
pub(crate) const PROBE_ORIGIN: (f64, f64) = (-6.1754, 106.8272);
pub(crate) const PROBE_DESTINATION: (f64, f64) = (-6.1805, 106.8284);

/// A routing integration that turns an origin/destination pair into a
/// travel distance.
///
/// `calculate_distance` never returns `Err`: an unavailable distance (bad
/// credentials, network blip, no route) is an expected operational outcome
/// carried as [`CalcResult::failure`], and the caller decides whether to
/// log it or decline to offer shipping.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    /// Stable identifier used in configuration (`SHIPRATE_PROVIDER`).
    fn slug(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// The declarative settings schema for this provider.
    fn settings_fields(&self) -> Vec<SettingsField>;

    async fn calculate_distance(
        &self,
        origin: &Location,
        destination: &Location,
        settings: &ProviderSettings,
    ) -> CalcResult;

    /// Validates `settings`: field-presence errors first, then one live
    /// test request over the fixed reference route. A failed test request
    /// is reported against the provider's secret field.
    async fn validate_settings(&self, settings: &ProviderSettings) -> Vec<FieldError> {
        let fields = self.settings_fields();
        let mut errors = collect_field_errors(&fields, settings);
        if !errors.is_empty() {
            return errors;
        }

        let (origin, destination) = probe_locations();
        let result = self.calculate_distance(&origin, &destination, settings).await;
        if let Some(message) = result.error() {
            let field = fields
                .iter()
                .find(|f| f.secret)
                .map_or(self.slug(), |f| f.key);
            errors.push(FieldError {
                field: field.to_owned(),
                message: format!("test request failed: {message}"),
            });
        }
        errors
    }
}

pub(crate) fn probe_locations() -> (Location, Location) {
    let origin = Location::from_coordinates(PROBE_ORIGIN.0, PROBE_ORIGIN.1);
    let destination = Location::from_coordinates(PROBE_DESTINATION.0, PROBE_DESTINATION.1);
    match (origin, destination) {
        (Ok(origin), Ok(destination)) => (origin, destination),
        _ => unreachable!("probe coordinates are fixed and in range"),
    }
}

/// A meters value extracted from a response, as a [`Distance`].
/// `None` for zero, negative, or non-finite values — all "no route".
pub(crate) fn distance_from_meters(meters: f64) -> Option<Distance> {
    if !meters.is_finite() || meters <= 0.0 {
        return None;
    }
    Decimal::from_f64(meters).map(|value| Distance::new(value, DistanceUnit::Meters))
}

/// Best available human-readable failure message for a dispatcher: the
/// first present API message path, else the transport error, else the
/// fallback annotated with the HTTP status.
pub(crate) fn api_error_message(
    dispatcher: &Dispatcher,
    message_paths: &[&[&str]],
    fallback: &str,
) -> String {
    for path in message_paths {
        if let Some(message) = dispatcher.json_str(path) {
            return message.to_owned();
        }
    }
    if let Some(transport) = dispatcher.transport_error() {
        return transport.to_owned();
    }
    match dispatcher.status() {
        Some(code) => format!("{fallback} (HTTP {code})"),
        None => fallback.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_locations_are_coordinates() {
        let (origin, destination) = probe_locations();
        assert_eq!(origin.coordinates().unwrap(), PROBE_ORIGIN);
        assert_eq!(destination.coordinates().unwrap(), PROBE_DESTINATION);
    }

    #[test]
    fn distance_from_meters_accepts_positive_values() {
        let distance = distance_from_meters(12_300.5).unwrap();
        assert_eq!(distance.in_meters(), "12300.5");
    }

    #[test]
    fn distance_from_meters_rejects_zero_and_nonsense() {
        assert!(distance_from_meters(0.0).is_none());
        assert!(distance_from_meters(-5.0).is_none());
        assert!(distance_from_meters(f64::NAN).is_none());
        assert!(distance_from_meters(f64::INFINITY).is_none());
    }
}
