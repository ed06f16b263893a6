//! Moneywords exchange-rate crate
//!
//! Fetches exchange-rate tables from several independent providers and
//! hides their failures from callers.
//!
//! # Overview
//!
//! - Multiple providers: CurrencyFreaks, ExchangeRate-API, National Bank of Belarus
//! - Fixed priority ordering with per-provider circuit breaking
//! - TTL cache keyed by (source selector, base currency)
//! - Static fallback table when every eligible provider misses
//!
//! # Architecture
//!
//! ```text
//! +----------------------+
//! | ExchangeRateService  |  cache lookup, fallback on miss
//! +----------------------+
//!            |
//!            v
//! +----------------------+
//! |  ProviderRegistry    |  selector, priority order, circuit breaker
//! +----------------------+
//!            |
//!            v
//! +----------------------+
//! |    RateProvider      |  CurrencyFreaks, ExchangeRate-API, NBRB
//! +----------------------+
//!            |
//!            v
//! +----------------------+
//! |    RateSnapshot      |  base + code -> rate, provenance tag
//! +----------------------+
//! ```
//!
//! Nothing in this crate surfaces a provider error to the caller of
//! [`ExchangeRateService::get_rates`]: failures are counted, logged and
//! replaced by the fallback table.

pub mod cache;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod models;
pub mod provider;
pub mod registry;
mod service;

pub use cache::RateCache;
pub use config::RatesConfig;
pub use errors::{RatesError, RetryClass};
pub use models::{RateSnapshot, RateSource, RateTable, RateValue, SourceSelector};
pub use provider::currency_freaks::CurrencyFreaksProvider;
pub use provider::exchange_rate_api::ExchangeRateApiProvider;
pub use provider::nbrb::NbrbProvider;
pub use provider::{HttpClient, RateProvider};
pub use registry::{CircuitBreaker, CircuitState, ProviderHealth, ProviderRegistry};
pub use service::ExchangeRateService;
