//! Immutable provider registry.
//!
//! Built once at startup with the full provider list and read-only from
//! then on; there is no runtime registration.

use std::sync::Arc;

use crate::distancematrix::DistanceMatrixAi;
use crate::error::ProviderError;
use crate::geoapify::GeoapifyRouting;
use crate::google::GoogleRoutes;
use crate::mapbox::MapboxMatrix;
use crate::provider::DistanceProvider;

pub struct ProviderRegistry {
    providers: Vec<Arc<dyn DistanceProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn DistanceProvider>>) -> Self {
        Self { providers }
    }

    /// Builds the registry with all four built-in providers.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if an HTTP client cannot be
    /// constructed.
    pub fn with_default_providers(
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self::new(vec![
            Arc::new(GoogleRoutes::new(timeout_secs, user_agent)?),
            Arc::new(MapboxMatrix::new(timeout_secs, user_agent)?),
            Arc::new(DistanceMatrixAi::new(timeout_secs, user_agent)?),
            Arc::new(GeoapifyRouting::new(timeout_secs, user_agent)?),
        ]))
    }

    #[must_use]
    pub fn get(&self, slug: &str) -> Option<Arc<dyn DistanceProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.slug() == slug)
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DistanceProvider>> {
        self.providers.iter()
    }

    #[must_use]
    pub fn slugs(&self) -> Vec<&'static str> {
        self.providers.iter().map(|provider| provider.slug()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_knows_all_four_providers() {
        let registry = ProviderRegistry::with_default_providers(10, "test-agent").unwrap();
        assert_eq!(
            registry.slugs(),
            vec!["google_routes", "mapbox", "distancematrix_ai", "geoapify"]
        );
    }

    #[test]
    fn lookup_by_slug() {
        let registry = ProviderRegistry::with_default_providers(10, "test-agent").unwrap();
        let provider = registry.get("mapbox").expect("mapbox should be registered");
        assert_eq!(provider.display_name(), "Mapbox Matrix");
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn every_provider_declares_exactly_one_secret_field() {
        let registry = ProviderRegistry::with_default_providers(10, "test-agent").unwrap();
        for provider in registry.iter() {
            let secrets = provider
                .settings_fields()
                .into_iter()
                .filter(|f| f.secret)
                .count();
            assert_eq!(secrets, 1, "{} secret fields", provider.slug());
        }
    }
}
