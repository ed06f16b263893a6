//! ExchangeRate-API provider (v6).
//!
//! `GET {base_url}/{key}/latest/{BASE}` returns
//! `{ "result": "success", "conversion_rates": { ... } }`. Failures are
//! reported in-band as `{ "result": "error", "error-type": "..." }`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::errors::RatesError;
use crate::models::RateTable;
use crate::provider::{into_table, HttpClient, RateProvider};

/// Provider ID constant
pub const PROVIDER_ID: &str = "exchangerate";

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, serde_json::Value>,
}

pub struct ExchangeRateApiProvider {
    http: Arc<HttpClient>,
    api_key: Option<String>,
    base_url: String,
}

impl ExchangeRateApiProvider {
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
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RatesError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| RatesError::NotConfigured {
            provider: PROVIDER_ID.to_string(),
        })?;

        debug!("Fetching {} rates from {}", base, PROVIDER_ID);
        let url = format!("{}/{}/latest/{}", self.base_url, api_key, base);
        let request = self.http.client()?.get(&url);

        let response: LatestResponse = self.http.get_json(PROVIDER_ID, request).await?;
        if response.result.as_deref() == Some("error") {
            return Err(RatesError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: response
                    .error_type
                    .unwrap_or_else(|| "unknown-error".to_string()),
            });
        }

        Ok(into_table(response.conversion_rates))
    }
}
