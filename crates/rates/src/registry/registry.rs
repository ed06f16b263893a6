//! Provider registry for orchestrating rate providers.

use std::sync::Arc;

use log::{debug, info, warn};

use super::{CircuitBreaker, ProviderHealth};
use crate::errors::{RatesError, RetryClass};
use crate::models::{RateSnapshot, RateSource, SourceSelector};
use crate::provider::RateProvider;

/// Provider registry for orchestrating rate fetching.
///
/// Providers are kept sorted by priority. The registry never falls back to
/// static data itself; it reports the last failure and lets the service
/// decide.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn RateProvider>>,
    circuit_breaker: CircuitBreaker,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn RateProvider>>, circuit_breaker: CircuitBreaker) -> Self {
        let mut providers = providers;
        providers.sort_by_key(|p| p.priority());
        Self {
            providers,
            circuit_breaker,
        }
    }

    /// Registered providers in priority order.
    pub fn providers(&self) -> &[Arc<dyn RateProvider>] {
        &self.providers
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    /// Find a provider by id, ignoring case.
    pub fn find(&self, id: &str) -> Option<&Arc<dyn RateProvider>> {
        self.providers.iter().find(|p| p.id().eq_ignore_ascii_case(id))
    }

    /// Fetch a rate table for `base` according to `selector`.
    ///
    /// - `Pinned`: only that provider is tried, regardless of its circuit.
    /// - `Auto`: providers are tried in priority order, skipping unconfigured
    ///   ones and those whose circuit is open, stopping at the first
    ///   non-empty table.
    pub async fn fetch(
        &self,
        base: &str,
        selector: &SourceSelector,
    ) -> Result<RateSnapshot, RatesError> {
        match selector {
            SourceSelector::Pinned(id) => {
                let provider = self
                    .find(id)
                    .ok_or_else(|| RatesError::UnknownProvider(id.clone()))?;
                self.attempt(provider.as_ref(), base).await
            }
            SourceSelector::Auto => self.fetch_auto(base).await,
        }
    }

    async fn fetch_auto(&self, base: &str) -> Result<RateSnapshot, RatesError> {
        let mut last_error: Option<RatesError> = None;

        for provider in &self.providers {
            let provider_id = provider.id();

            if !provider.is_configured() {
                debug!("Provider '{}' is not configured, skipping", provider_id);
                continue;
            }

            if !self.circuit_breaker.is_allowed(provider_id) {
                debug!(
                    "Circuit breaker open for provider '{}', skipping",
                    provider_id
                );
                continue;
            }

            match self.attempt(provider.as_ref(), base).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or(RatesError::AllProvidersFailed))
    }

    /// One provider call, with failure accounting.
    async fn attempt(&self, provider: &dyn RateProvider, base: &str) -> Result<RateSnapshot, RatesError> {
        let provider_id = provider.id();
        info!("Fetching {} rates from provider '{}'", base, provider_id);

        let result = provider.fetch_rates(base).await.and_then(|rates| {
            if rates.is_empty() {
                Err(RatesError::EmptyPayload {
                    provider: provider_id.to_string(),
                })
            } else {
                Ok(rates)
            }
        });

        match result {
            Ok(rates) => {
                self.circuit_breaker.record_success(provider_id);
                info!(
                    "Fetched {} {} rates from '{}'",
                    rates.len(),
                    base,
                    provider_id
                );
                Ok(RateSnapshot::new(base, rates, RateSource::Provider(provider_id)))
            }
            Err(e) => {
                match e.retry_class() {
                    RetryClass::FailoverWithPenalty => {
                        self.circuit_breaker.record_failure(provider_id);
                        warn!(
                            "Provider '{}' failed: {}, recorded circuit breaker failure",
                            provider_id, e
                        );
                    }
                    RetryClass::NextProvider | RetryClass::Never => {
                        info!("Provider '{}' skipped: {}", provider_id, e);
                    }
                }
                Err(e)
            }
        }
    }

    /// Health of every registered provider, in priority order.
    pub fn health(&self) -> Vec<ProviderHealth> {
        self.circuit_breaker
            .health(self.providers.iter().map(|p| p.id()))
    }

    /// Reset one provider's failure counter. Returns false for unknown ids.
    pub fn reset_circuit(&self, id: &str) -> bool {
        match self.find(id) {
            Some(provider) => {
                self.circuit_breaker.reset(provider.id());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RateTable, RateValue};
    use crate::registry::CircuitState;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        Fail,
        Empty,
        Unconfigured,
    }

    struct MockProvider {
        id: &'static str,
        priority: u8,
        behavior: Behavior,
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn new(id: &'static str, priority: u8, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                id,
                priority,
                behavior,
                call_count: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn is_configured(&self) -> bool {
            !matches!(self.behavior, Behavior::Unconfigured)
        }

        async fn fetch_rates(&self, _base: &str) -> Result<RateTable, RatesError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => {
                    let mut rates = RateTable::new();
                    rates.insert("EUR".to_string(), RateValue::Number(dec!(0.9)));
                    rates.insert("USD".to_string(), RateValue::Number(dec!(1)));
                    Ok(rates)
                }
                Behavior::Fail => Err(RatesError::BadStatus {
                    provider: self.id.to_string(),
                    status: 500,
                }),
                Behavior::Empty => Ok(RateTable::new()),
                Behavior::Unconfigured => Err(RatesError::NotConfigured {
                    provider: self.id.to_string(),
                }),
            }
        }
    }

    fn registry(providers: Vec<Arc<MockProvider>>) -> ProviderRegistry {
        ProviderRegistry::new(
            providers
                .into_iter()
                .map(|p| p as Arc<dyn RateProvider>)
                .collect(),
            CircuitBreaker::new(3),
        )
    }

    #[tokio::test]
    async fn test_providers_sorted_by_priority() {
        let low = MockProvider::new("low", 5, Behavior::Succeed);
        let high = MockProvider::new("high", 1, Behavior::Succeed);
        let registry = registry(vec![low.clone(), high.clone()]);

        let ids: Vec<_> = registry.providers().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["high", "low"]);

        let snapshot = registry.fetch("USD", &SourceSelector::Auto).await.unwrap();
        assert_eq!(snapshot.source, RateSource::Provider("high"));
        assert_eq!(low.calls(), 0);
    }

    #[tokio::test]
    async fn test_auto_falls_through_failures_and_empty_payloads() {
        let failing = MockProvider::new("failing", 1, Behavior::Fail);
        let empty = MockProvider::new("empty", 2, Behavior::Empty);
        let good = MockProvider::new("good", 3, Behavior::Succeed);
        let registry = registry(vec![failing.clone(), empty.clone(), good.clone()]);

        let snapshot = registry.fetch("USD", &SourceSelector::Auto).await.unwrap();
        assert_eq!(snapshot.source, RateSource::Provider("good"));
        assert_eq!(snapshot.rate("EUR"), Some(dec!(0.9)));

        // Only real failures are penalized
        assert_eq!(registry.circuit_breaker().failure_count("failing"), 1);
        assert_eq!(registry.circuit_breaker().failure_count("empty"), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_never_called() {
        let unconfigured = MockProvider::new("keyless", 1, Behavior::Unconfigured);
        let good = MockProvider::new("good", 2, Behavior::Succeed);
        let registry = registry(vec![unconfigured.clone(), good]);

        registry.fetch("USD", &SourceSelector::Auto).await.unwrap();
        assert_eq!(unconfigured.calls(), 0);
        assert_eq!(registry.circuit_breaker().failure_count("keyless"), 0);
    }

    #[tokio::test]
    async fn test_open_circuit_is_skipped_in_auto() {
        let failing = MockProvider::new("failing", 1, Behavior::Fail);
        let registry = registry(vec![failing.clone()]);

        for _ in 0..3 {
            assert!(registry.fetch("USD", &SourceSelector::Auto).await.is_err());
        }
        assert_eq!(failing.calls(), 3);

        let err = registry.fetch("USD", &SourceSelector::Auto).await.unwrap_err();
        assert!(matches!(err, RatesError::AllProvidersFailed));
        assert_eq!(failing.calls(), 3);
    }

    #[tokio::test]
    async fn test_pinned_bypasses_open_circuit() {
        let failing = MockProvider::new("failing", 1, Behavior::Fail);
        let registry = registry(vec![failing.clone()]);
        for _ in 0..3 {
            registry.circuit_breaker().record_failure("failing");
        }

        let selector = SourceSelector::pinned("FAILING");
        assert!(registry.fetch("USD", &selector).await.is_err());
        assert_eq!(failing.calls(), 1);
    }

    #[tokio::test]
    async fn test_pinned_unknown_provider() {
        let registry = registry(vec![MockProvider::new("good", 1, Behavior::Succeed)]);
        let err = registry
            .fetch("USD", &SourceSelector::pinned("openexchangerates"))
            .await
            .unwrap_err();
        assert!(matches!(err, RatesError::UnknownProvider(ref id) if id == "openexchangerates"));
    }

    #[tokio::test]
    async fn test_health_and_reset() {
        let failing = MockProvider::new("failing", 1, Behavior::Fail);
        let good = MockProvider::new("good", 2, Behavior::Succeed);
        let registry = registry(vec![good, failing]);
        for _ in 0..3 {
            registry.circuit_breaker().record_failure("failing");
        }

        let health = registry.health();
        assert_eq!(health[0].provider, "failing");
        assert_eq!(health[0].state, CircuitState::Open);
        assert_eq!(health[1].state, CircuitState::Closed);

        assert!(registry.reset_circuit("Failing"));
        assert!(!registry.reset_circuit("unknown"));
        assert_eq!(registry.circuit_breaker().failure_count("failing"), 0);
    }
}
