//! Forward-geocoding pre-step shared by providers that only route between
//! coordinates.
//!
//! Geocoding is best-effort: on any failure the original location passes
//! through unchanged and the subsequent distance request carries the
//! unresolved form. The degrade is silent apart from a debug event.

use std::future::Future;

use shiprate_core::{Location, LocationKind};

/// Resolves an address-typed location to coordinates via `geocode`,
/// falling back to a clone of the original on any failure. Coordinate
/// locations are returned as-is.
pub(crate) async fn geocode_or_original<F, Fut>(
    location: &Location,
    slug: &'static str,
    geocode: F,
) -> Location
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Option<(f64, f64)>>,
{
    if location.kind() == LocationKind::Coordinates {
        return location.clone();
    }

    match geocode(location.to_query_text()).await {
        Some((lat, lng)) => match Location::from_coordinates(lat, lng) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::debug!(
                    provider = slug,
                    error = %e,
                    "geocoder returned out-of-range coordinates - using original location"
                );
                location.clone()
            }
        },
        None => {
            tracing::debug!(provider = slug, "geocoding failed - using original location");
            location.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn coordinates_skip_the_geocoder() {
        let location = Location::from_coordinates(-6.2, 106.8).unwrap();
        let resolved =
            geocode_or_original(&location, "test", |_| async { panic!("must not geocode") })
                .await;
        assert_eq!(resolved, location);
    }

    #[tokio::test]
    async fn address_resolves_to_coordinates() {
        let location = Location::from_address("Monas, Jakarta").unwrap();
        let resolved =
            geocode_or_original(&location, "test", |_| async { Some((-6.1754, 106.8272)) })
                .await;
        assert_eq!(resolved.coordinates().unwrap(), (-6.1754, 106.8272));
    }

    #[tokio::test]
    async fn failed_geocode_passes_original_through() {
        let location = Location::from_address("nowhere in particular").unwrap();
        let resolved = geocode_or_original(&location, "test", |_| async { None }).await;
        assert_eq!(resolved, location);
    }

    #[tokio::test]
    async fn out_of_range_geocode_passes_original_through() {
        let location = Location::from_address("confused geocoder").unwrap();
        let resolved =
            geocode_or_original(&location, "test", |_| async { Some((95.0, 0.0)) }).await;
        assert_eq!(resolved, location);
    }
}
