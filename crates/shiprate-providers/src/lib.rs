//! Pluggable HTTP distance providers for the shiprate workspace.
//!
//! The [`DistanceProvider`] trait turns an origin/destination pair into a
//! [`CalcResult`] via one provider-specific HTTP call (plus an optional
//! geocoding pre-step). All request execution goes through [`Dispatcher`],
//! whose masked [`Dispatcher::to_debug_value`] output is the only form of
//! request/response data allowed near a log sink.

mod dispatch;
mod distancematrix;
mod error;
mod fields;
mod geoapify;
mod geocode;
mod google;
mod mapbox;
mod params;
mod provider;
mod registry;
mod result;

pub use dispatch::{mask_nothing, Dispatcher, Masker, REDACTED};
pub use distancematrix::DistanceMatrixAi;
pub use error::ProviderError;
pub use fields::{
    build_request_parts, collect_field_errors, trimmed, trimmed_lowercase, trimmed_uppercase,
    FieldError, FieldTarget, ProviderSettings, Sanitizer, SettingsField,
};
pub use geoapify::GeoapifyRouting;
pub use google::GoogleRoutes;
pub use mapbox::MapboxMatrix;
pub use params::{RequestHeaders, RequestParams};
pub use provider::DistanceProvider;
pub use registry::ProviderRegistry;
pub use result::{CalcOutcome, CalcResult};
