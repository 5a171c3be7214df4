//! Command handlers for the CLI.
//!
//! These wire the env config, the rates file, the provider registry, and
//! the engine together. Provider settings are read from the environment
//! against the selected provider's own field schema
//! (`SHIPRATE_<FIELD_KEY>`, e.g. `SHIPRATE_API_KEY`, `SHIPRATE_ACCESS_TOKEN`).

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use shiprate_core::{AppConfig, LineItem, Location, OrderContext};
use shiprate_providers::{DistanceProvider, ProviderRegistry, ProviderSettings};

/// Default user agent for commands that run without a full config
/// (`providers`, `validate` before config is required).
const FALLBACK_USER_AGENT: &str = "shiprate/0.1 (distance-rate-quotes)";

pub(crate) async fn run_quote(
    origin: &str,
    destination: &str,
    subtotal: &str,
    quantity: u32,
    product_id: i64,
    shipping_class: Option<i64>,
) -> anyhow::Result<()> {
    let config = shiprate_core::load_app_config()?;
    let rates = shiprate_core::load_rates(&config.rates_path)?;
    let provider = resolve_provider(&config)?;
    let settings = provider_settings_from_env(provider.as_ref());

    let origin = parse_location(origin)?;
    let destination = parse_location(destination)?;

    let subtotal = Decimal::from_str(subtotal)
        .map_err(|e| anyhow::anyhow!("invalid --subtotal '{subtotal}': {e}"))?;
    let ctx = OrderContext {
        subtotal,
        item_count: quantity,
        items: vec![LineItem {
            product_id,
            shipping_class_id: shipping_class,
            quantity,
            needs_shipping: true,
        }],
    };

    let result = provider
        .calculate_distance(&origin, &destination, &settings)
        .await;
    let distance = match result.distance() {
        Some(distance) => distance,
        None => {
            // The operator sees the detail; a storefront would only see
            // "this shipping method is not offered".
            let message = result.error().unwrap_or("distance unavailable");
            tracing::warn!(provider = provider.slug(), error = message, "distance calculation failed");
            anyhow::bail!("shipping unavailable: {message}");
        }
    };

    match shiprate_engine::quote(&rates.rates, distance, &ctx, &rates.settings) {
        Some(quote) => println!("{}: {}", quote.label, quote.formatted_cost),
        None => println!("no shipping option available"),
    }
    Ok(())
}

pub(crate) fn run_providers() -> anyhow::Result<()> {
    let registry = ProviderRegistry::with_default_providers(10, FALLBACK_USER_AGENT)?;
    for provider in registry.iter() {
        println!("{:<18} {}", provider.slug(), provider.display_name());
    }
    Ok(())
}

pub(crate) async fn run_validate(provider_slug: Option<&str>) -> anyhow::Result<()> {
    let slug = match provider_slug {
        Some(slug) => slug.to_owned(),
        None => shiprate_core::load_app_config()?.provider,
    };
    let registry = ProviderRegistry::with_default_providers(10, FALLBACK_USER_AGENT)?;
    let provider = registry
        .get(&slug)
        .ok_or_else(|| unknown_provider(&slug, &registry))?;
    let settings = provider_settings_from_env(provider.as_ref());

    let errors = provider.validate_settings(&settings).await;
    if errors.is_empty() {
        println!("{}: settings are valid", provider.slug());
        return Ok(());
    }
    for error in &errors {
        eprintln!("{}: {}", error.field, error.message);
    }
    anyhow::bail!("{} validation error(s)", errors.len());
}

fn resolve_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn DistanceProvider>> {
    let registry =
        ProviderRegistry::with_default_providers(config.request_timeout_secs, &config.user_agent)?;
    registry
        .get(&config.provider)
        .ok_or_else(|| unknown_provider(&config.provider, &registry))
}

fn unknown_provider(slug: &str, registry: &ProviderRegistry) -> anyhow::Error {
    anyhow::anyhow!(
        "unknown provider '{slug}' (available: {})",
        registry.slugs().join(", ")
    )
}

/// `"lat,lng"` parses as coordinates; anything else is an address string.
/// Addresses containing commas fall through naturally because their parts
/// are not numbers.
pub(crate) fn parse_location(input: &str) -> anyhow::Result<Location> {
    if let Some((lat, lng)) = input.split_once(',') {
        if let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
            return Location::from_coordinates(lat, lng)
                .map_err(|e| anyhow::anyhow!("invalid coordinates '{input}': {e}"));
        }
    }
    Location::from_address(input).map_err(|e| anyhow::anyhow!("invalid location '{input}': {e}"))
}

/// Reads `SHIPRATE_<FIELD_KEY>` env vars for each declared settings field.
fn provider_settings_from_env(provider: &dyn DistanceProvider) -> ProviderSettings {
    provider
        .settings_fields()
        .iter()
        .filter_map(|field| {
            std::env::var(format!("SHIPRATE_{}", field.key.to_uppercase()))
                .ok()
                .map(|value| (field.key.to_owned(), value))
        })
        .collect()
}
