//! Configuration for the rates layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::provider::{currency_freaks, exchange_rate_api, nbrb};

/// Provider credentials, endpoints and resilience knobs.
///
/// Every field has a default, so a partial JSON document (or none at all)
/// yields a working configuration. Providers without a key are skipped.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatesConfig {
    pub currency_freaks_api_key: Option<String>,
    pub currency_freaks_base_url: String,
    pub exchange_rate_api_key: Option<String>,
    pub exchange_rate_base_url: String,
    pub nbrb_base_url: String,
    /// Per-request network timeout
    pub request_timeout_secs: u64,
    /// Snapshot time-to-live
    pub cache_ttl_secs: u64,
    /// Consecutive failures before a provider is skipped in `auto` mode
    pub max_failures: u32,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            currency_freaks_api_key: None,
            currency_freaks_base_url: currency_freaks::DEFAULT_BASE_URL.to_string(),
            exchange_rate_api_key: None,
            exchange_rate_base_url: exchange_rate_api::DEFAULT_BASE_URL.to_string(),
            nbrb_base_url: nbrb::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            cache_ttl_secs: 600,
            max_failures: 3,
        }
    }
}

impl RatesConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
