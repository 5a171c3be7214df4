//! DistanceMatrix.ai provider.
//!
//! Speaks the Google-Distance-Matrix-compatible dialect: one GET with
//! `origins`/`destinations` query params that accept either `lat,lng`
//! pairs or free-form addresses, so no geocoding pre-step is needed.

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
use crate::provider::{api_error_message, distance_from_meters, DistanceProvider};
use crate::result::CalcResult;

const DEFAULT_BASE_URL: &str = "https://api.distancematrix.ai";

pub struct DistanceMatrixAi {
    client: Client,
    base_url: String,
}

impl DistanceMatrixAi {
    /// Creates a provider pointed at the production DistanceMatrix.ai API.
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

    fn point(location: &Location) -> String {
        match location {
            Location::Coordinates { lat, lng } => format!("{lat},{lng}"),
            other => other.to_query_text(),
        }
    }

    fn mask(path: &str, _value: &str) -> Option<String> {
        path.ends_with(".key").then(|| REDACTED.to_owned())
    }
}

#[async_trait::async_trait]
impl DistanceProvider for DistanceMatrixAi {
    fn slug(&self) -> &'static str {
        "distancematrix_ai"
    }

    fn display_name(&self) -> &'static str {
        "DistanceMatrix.ai"
    }

    fn settings_fields(&self) -> Vec<SettingsField> {
        vec![
            SettingsField::new("api_key", "API key")
                .required()
                .secret()
                .param("key")
                .sanitize(trimmed),
            SettingsField::new("travel_mode", "Travel mode")
                .with_default("driving")
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

        let (mut params, headers) = build_request_parts(&fields, settings);
        params.add("origins", Value::String(Self::point(origin)));
        params.add("destinations", Value::String(Self::point(destination)));

        let url = format!("{}/maps/api/distancematrix/json", self.base_url);
        let dispatcher = Dispatcher::get(&self.client, &url, params, headers, Self::mask).await;

        let top_status = dispatcher.json_str(&["status"]);
        if dispatcher.is_error() || top_status != Some("OK") {
            let message = api_error_message(
                &dispatcher,
                &[&["error_message"]],
                "DistanceMatrix.ai request failed",
            );
            tracing::warn!(
                provider = self.slug(),
                exchange = %dispatcher.to_debug_value(),
                "distance request failed"
            );
            return CalcResult::failure(message, Some(dispatcher));
        }

        if dispatcher.json_str(&["rows", "0", "elements", "0", "status"]) != Some("OK") {
            let message = dispatcher
                .json_str(&["error_message"])
                .unwrap_or("no route found between origin and destination")
                .to_owned();
            return CalcResult::failure(message, Some(dispatcher));
        }

        match dispatcher
            .json_f64(&["rows", "0", "elements", "0", "distance", "value"])
            .and_then(distance_from_meters)
        {
            Some(distance) => CalcResult::success(distance, dispatcher),
            None => CalcResult::failure(
                "DistanceMatrix.ai returned no usable distance",
                Some(dispatcher),
            ),
        }
    }
}
