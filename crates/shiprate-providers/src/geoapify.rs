//! Geoapify Routing API provider.
//!
//! Routing takes `lat,lng` waypoints joined with `|`; address-typed
//! locations are first resolved through the Geoapify geocoder with the
//! same silent fallback as Mapbox.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use shiprate_core::Location;

use crate::dispatch::{Dispatcher, REDACTED};
use crate::error::ProviderError;
use crate::fields::{
    build_request_parts, collect_field_errors, trimmed, trimmed_lowercase, ProviderSettings,
    SettingsField,
};
use crate::geocode::geocode_or_original;
use crate::params::{RequestHeaders, RequestParams};
use crate::provider::{api_error_message, distance_from_meters, DistanceProvider};
use crate::result::CalcResult;

const DEFAULT_BASE_URL: &str = "https://api.geoapify.com";

pub struct GeoapifyRouting {
    client: Client,
    base_url: String,
}

impl GeoapifyRouting {
    /// Creates a provider pointed at the production Geoapify API.
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

    fn waypoint(location: &Location) -> String {
        match location {
            Location::Coordinates { lat, lng } => format!("{lat},{lng}"),
            other => other.to_query_text(),
        }
    }

    fn mask(path: &str, _value: &str) -> Option<String> {
        path.ends_with(".apiKey").then(|| REDACTED.to_owned())
    }

    async fn geocode(&self, query: String, settings: &ProviderSettings) -> Option<(f64, f64)> {
        let api_key = settings.get("api_key")?;
        let url = format!("{}/v1/geocode/search", self.base_url);

        let mut params = RequestParams::new();
        params.add("text", Value::String(query));
        params.add("format", Value::String("json".to_owned()));
        params.add("limit", Value::String("1".to_owned()));
        params.add("apiKey", Value::String(api_key.to_owned()));

        let dispatcher =
            Dispatcher::get(&self.client, &url, params, RequestHeaders::new(), Self::mask).await;
        if dispatcher.is_error() {
            tracing::debug!(
                provider = "geoapify",
                exchange = %dispatcher.to_debug_value(),
                "geocoding request failed"
            );
            return None;
        }

        let lat = dispatcher.json_f64(&["results", "0", "lat"])?;
        let lon = dispatcher.json_f64(&["results", "0", "lon"])?;
        Some((lat, lon))
    }
}

#[async_trait::async_trait]
impl DistanceProvider for GeoapifyRouting {
    fn slug(&self) -> &'static str {
        "geoapify"
    }

    fn display_name(&self) -> &'static str {
        "Geoapify Routing"
    }

    fn settings_fields(&self) -> Vec<SettingsField> {
        vec![
            SettingsField::new("api_key", "API key")
                .required()
                .secret()
                .param("apiKey")
                .sanitize(trimmed),
            SettingsField::new("travel_mode", "Travel mode")
                .with_default("drive")
                .param("mode")
                .sanitize(trimmed_lowercase),
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

        let origin = geocode_or_original(origin, "geoapify", |q| self.geocode(q, settings)).await;
        let destination =
            geocode_or_original(destination, "geoapify", |q| self.geocode(q, settings)).await;

        let (mut params, headers) = build_request_parts(&fields, settings);
        params.add(
            "waypoints",
            Value::String(format!(
                "{}|{}",
                Self::waypoint(&origin),
                Self::waypoint(&destination)
            )),
        );

        let url = format!("{}/v1/routing", self.base_url);
        let dispatcher = Dispatcher::get(&self.client, &url, params, headers, Self::mask).await;

        if dispatcher.is_error() {
            let message = api_error_message(
                &dispatcher,
                &[&["message"]],
                "Geoapify routing request failed",
            );
            tracing::warn!(
                provider = self.slug(),
                exchange = %dispatcher.to_debug_value(),
                "distance request failed"
            );
            return CalcResult::failure(message, Some(dispatcher));
        }

        match dispatcher
            .json_f64(&["features", "0", "properties", "distance"])
            .and_then(distance_from_meters)
        {
            Some(distance) => CalcResult::success(distance, dispatcher),
            None => {
                let message = dispatcher
                    .json_str(&["message"])
                    .unwrap_or("Geoapify returned no route for these waypoints")
                    .to_owned();
                CalcResult::failure(message, Some(dispatcher))
            }
        }
    }
}
