//! CurrencyFreaks provider.
//!
//! Returns `{ "base": "USD", "rates": { "EUR": "0.92", ... } }`. Rates are
//! usually quoted as strings, which is why tables keep raw values.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::errors::RatesError;
use crate::models::RateTable;
use crate::provider::{into_table, HttpClient, RateProvider};

/// Provider ID constant
pub const PROVIDER_ID: &str = "currencyfreaks";

/// Default endpoint for latest rates
pub const DEFAULT_BASE_URL: &str = "https://api.currencyfreaks.com/v2.0/rates/latest";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: HashMap<String, serde_json::Value>,
}

pub struct CurrencyFreaksProvider {
    http: Arc<HttpClient>,
    api_key: Option<String>,
    base_url: String,
}

impl CurrencyFreaksProvider {
    pub fn new(http: Arc<HttpClient>, api_key: Option<String>) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        http: Arc<HttpClient>,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RateProvider for CurrencyFreaksProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RatesError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| RatesError::NotConfigured {
            provider: PROVIDER_ID.to_string(),
        })?;

        debug!("Fetching {} rates from {}", base, PROVIDER_ID);
        let request = self
            .http
            .client()?
            .get(&self.base_url)
            .query(&[("apikey", api_key), ("base", base)]);

        let response: LatestResponse = self.http.get_json(PROVIDER_ID, request).await?;
        Ok(into_table(response.rates))
    }
}
