//! Google Routes API provider (`computeRouteMatrix`).
//!
//! One POST per calculation. Coordinates travel as nested
//! `{location: {latLng: ...}}` waypoints; address-typed locations go
//! through the API's own address resolution, so no geocoding pre-step is
//! needed. The API key is a header and is masked out of debug dumps.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use shiprate_core::Location;

use crate::dispatch::{Dispatcher, REDACTED};
use crate::error::ProviderError;
use crate::fields::{
    build_request_parts, collect_field_errors, trimmed, trimmed_uppercase, ProviderSettings,
    SettingsField,
};
use crate::provider::{api_error_message, distance_from_meters, DistanceProvider};
use crate::result::CalcResult;

const DEFAULT_BASE_URL: &str = "https://routes.googleapis.com";
const FIELD_MASK: &str = "originIndex,destinationIndex,distanceMeters,condition,status";

pub struct GoogleRoutes {
    client: Client,
    base_url: String,
}

impl GoogleRoutes {
    /// Creates a provider pointed at the production Routes API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a provider with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn waypoint(location: &Location) -> Value {
        match location {
            Location::Coordinates { lat, lng } => json!({
                "location": {"latLng": {"latitude": lat, "longitude": lng}}
            }),
            other => json!({"address": other.to_query_text()}),
        }
    }

    fn mask(path: &str, _value: &str) -> Option<String> {
        path.ends_with(".X-Goog-Api-Key").then(|| REDACTED.to_owned())
    }
}

#[async_trait::async_trait]
impl DistanceProvider for GoogleRoutes {
    fn slug(&self) -> &'static str {
        "google_routes"
    }

    fn display_name(&self) -> &'static str {
        "Google Routes"
    }

    fn settings_fields(&self) -> Vec<SettingsField> {
        vec![
            SettingsField::new("api_key", "API key")
                .required()
                .secret()
                .header("X-Goog-Api-Key")
                .sanitize(trimmed),
            SettingsField::new("travel_mode", "Travel mode")
                .with_default("DRIVE")
                .param("travelMode")
                .sanitize(trimmed_uppercase),
            SettingsField::new("avoid_tolls", "Avoid tolls"),
        ]
    }

    async fn calculate_distance(
        &self,
        origin: &Location,
        destination: &Location,
        settings: &ProviderSettings,
    ) -> CalcResult {
        let fields = self.settings_fields();
        if let Some(error) = collect_field_errors(&fields, settings).into_iter().next() {
            return CalcResult::failure(error.message, None);
        }

        let (mut params, mut headers) = build_request_parts(&fields, settings);
        headers.add("X-Goog-FieldMask", FIELD_MASK);

        let mut origin_entry = json!({"waypoint": Self::waypoint(origin)});
        if settings
            .get("avoid_tolls")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            origin_entry["routeModifiers"] = json!({"avoidTolls": true});
        }
        params.add("origins", Value::Array(vec![origin_entry]));
        params.add(
            "destinations",
            json!([{"waypoint": Self::waypoint(destination)}]),
        );

        let url = format!("{}/distanceMatrix/v2:computeRouteMatrix", self.base_url);
        let dispatcher = Dispatcher::post(&self.client, &url, params, headers, Self::mask).await;

        if dispatcher.is_error() {
            let message = api_error_message(
                &dispatcher,
                &[&["error", "message"]],
                "Google Routes request failed",
            );
            tracing::warn!(
                provider = self.slug(),
                exchange = %dispatcher.to_debug_value(),
                "distance request failed"
            );
            return CalcResult::failure(message, Some(dispatcher));
        }

        // Response is a bare JSON array of route-matrix elements; with one
        // origin and one destination only element 0 exists.
        if dispatcher.json_str(&["0", "condition"]) != Some("ROUTE_EXISTS") {
            let message = dispatcher
                .json_str(&["0", "status", "message"])
                .unwrap_or("no route exists between origin and destination")
                .to_owned();
            return CalcResult::failure(message, Some(dispatcher));
        }

        match dispatcher
            .json_f64(&["0", "distanceMeters"])
            .and_then(distance_from_meters)
        {
            Some(distance) => CalcResult::success(distance, dispatcher),
            None => CalcResult::failure(
                "Google Routes returned no usable distance",
                Some(dispatcher),
            ),
        }
    }
}
