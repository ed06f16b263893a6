use std::sync::Arc;

use log::{info, warn};

use crate::cache::RateCache;
use crate::config::RatesConfig;
use crate::fallback;
use crate::models::{RateSnapshot, SourceSelector};
use crate::provider::currency_freaks::CurrencyFreaksProvider;
use crate::provider::exchange_rate_api::ExchangeRateApiProvider;
use crate::provider::nbrb::NbrbProvider;
use crate::provider::{HttpClient, RateProvider};
use crate::registry::{CircuitBreaker, ProviderHealth, ProviderRegistry};

/// Entry point for exchange rates.
///
/// Owns the shared HTTP client, the provider registry with its failure
/// counters and the snapshot cache. One long-lived instance per process;
/// tests build isolated instances.
pub struct ExchangeRateService {
    http: Arc<HttpClient>,
    registry: ProviderRegistry,
    cache: RateCache,
}

impl ExchangeRateService {
    /// Build the service with the three built-in providers.
    pub fn new(config: &RatesConfig) -> Self {
        let http = Arc::new(HttpClient::new(config.request_timeout()));
        let providers: Vec<Arc<dyn RateProvider>> = vec![
            Arc::new(CurrencyFreaksProvider::with_base_url(
                http.clone(),
                config.currency_freaks_api_key.clone(),
                config.currency_freaks_base_url.clone(),
            )),
            Arc::new(ExchangeRateApiProvider::with_base_url(
                http.clone(),
                config.exchange_rate_api_key.clone(),
                config.exchange_rate_base_url.clone(),
            )),
            Arc::new(NbrbProvider::with_url(
                http.clone(),
                config.nbrb_base_url.clone(),
            )),
        ];

        Self::with_providers(http, providers, config)
    }

    /// Build the service around an explicit provider list.
    pub fn with_providers(
        http: Arc<HttpClient>,
        providers: Vec<Arc<dyn RateProvider>>,
        config: &RatesConfig,
    ) -> Self {
        Self {
            http,
            registry: ProviderRegistry::new(providers, CircuitBreaker::new(config.max_failures)),
            cache: RateCache::new(config.cache_ttl()),
        }
    }

    /// Rates for `base` according to `selector`.
    ///
    /// Never fails: a cache hit is returned without I/O, otherwise the
    /// registry is consulted and any failure is replaced by the static
    /// fallback table. Whatever is returned is cached.
    pub async fn get_rates(&self, base: &str, selector: &SourceSelector) -> Arc<RateSnapshot> {
        let base = base.trim().to_uppercase();

        if let Some(snapshot) = self.cache.get(selector, &base) {
            return snapshot;
        }

        let snapshot = match self.registry.fetch(&base, selector).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    "No live {} rates for selector '{}' ({}), using fallback table",
                    base, selector, e
                );
                fallback::fallback_snapshot(&base)
            }
        };

        let snapshot = Arc::new(snapshot);
        self.cache.insert(selector, &base, Arc::clone(&snapshot));
        snapshot
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Failure counters for every provider, in priority order.
    pub fn provider_health(&self) -> Vec<ProviderHealth> {
        self.registry.health()
    }

    /// Manually reset one provider's failure counter.
    pub fn reset_provider(&self, id: &str) -> bool {
        self.registry.reset_circuit(id)
    }

    /// Release the shared HTTP client.
    pub fn close(&self) {
        info!("Closing exchange rate service");
        self.http.close();
    }
}
