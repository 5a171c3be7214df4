//! Mapbox Matrix API provider.
//!
//! The matrix endpoint only accepts `lng,lat` coordinate pairs in the URL
//! path, so address-typed locations are first resolved through the Mapbox
//! geocoder. A failed geocode degrades silently: the unresolved text is
//! passed through and the matrix call reports the provider's own error.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
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

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

pub struct MapboxMatrix {
    client: Client,
    base_url: String,
}

impl MapboxMatrix {
    /// Creates a provider pointed at the production Mapbox API.
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

    /// Mapbox wants `lng,lat` order. Unresolved locations are
    /// percent-encoded so the URL stays well-formed and the API reports
    /// its own error for them.
    fn path_segment(location: &Location) -> String {
        match location {
            Location::Coordinates { lat, lng } => format!("{lng},{lat}"),
            other => utf8_percent_encode(&other.to_query_text(), NON_ALPHANUMERIC).to_string(),
        }
    }

    fn mask(path: &str, _value: &str) -> Option<String> {
        path.ends_with(".access_token").then(|| REDACTED.to_owned())
    }

    async fn geocode(&self, query: String, settings: &ProviderSettings) -> Option<(f64, f64)> {
        let token = settings.get("access_token")?;
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC).to_string();
        let url = format!("{}/geocoding/v5/mapbox.places/{encoded}.json", self.base_url);

        let mut params = RequestParams::new();
        params.add("access_token", Value::String(token.to_owned()));
        params.add("limit", Value::String("1".to_owned()));

        let dispatcher =
            Dispatcher::get(&self.client, &url, params, RequestHeaders::new(), Self::mask).await;
        if dispatcher.is_error() {
            tracing::debug!(
                provider = "mapbox",
                exchange = %dispatcher.to_debug_value(),
                "geocoding request failed"
            );
            return None;
        }

        let lng = dispatcher.json_f64(&["features", "0", "center", "0"])?;
        let lat = dispatcher.json_f64(&["features", "0", "center", "1"])?;
        Some((lat, lng))
    }
}

#[async_trait::async_trait]
impl DistanceProvider for MapboxMatrix {
    fn slug(&self) -> &'static str {
        "mapbox"
    }

    fn display_name(&self) -> &'static str {
        "Mapbox Matrix"
    }

    fn settings_fields(&self) -> Vec<SettingsField> {
        vec![
            SettingsField::new("access_token", "Access token")
                .required()
                .secret()
                .param("access_token")
                .sanitize(trimmed),
            SettingsField::new("routing_profile", "Routing profile")
                .with_default("driving")
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

        let origin = geocode_or_original(origin, "mapbox", |q| self.geocode(q, settings)).await;
        let destination =
            geocode_or_original(destination, "mapbox", |q| self.geocode(q, settings)).await;

        let profile = settings.get_or("routing_profile", "driving").to_lowercase();
        let url = format!(
            "{}/directions-matrix/v1/mapbox/{}/{};{}",
            self.base_url,
            profile,
            Self::path_segment(&origin),
            Self::path_segment(&destination),
        );

        let (mut params, headers) = build_request_parts(&fields, settings);
        params.add("annotations", Value::String("distance".to_owned()));

        let dispatcher = Dispatcher::get(&self.client, &url, params, headers, Self::mask).await;

        if dispatcher.is_error() || dispatcher.json_str(&["code"]) != Some("Ok") {
            let message = api_error_message(
                &dispatcher,
                &[&["message"]],
                "Mapbox matrix request failed",
            );
            tracing::warn!(
                provider = self.slug(),
                exchange = %dispatcher.to_debug_value(),
                "distance request failed"
            );
            return CalcResult::failure(message, Some(dispatcher));
        }

        match dispatcher
            .json_f64(&["distances", "0", "1"])
            .and_then(distance_from_meters)
        {
            Some(distance) => CalcResult::success(distance, dispatcher),
            None => {
                CalcResult::failure("Mapbox returned no distance for this route", Some(dispatcher))
            }
        }
    }
}
