//! Shared HTTP client for all providers.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::RatesError;

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A single connection pool shared by every provider.
///
/// The underlying `reqwest::Client` is built on first use and dropped by
/// [`close`](Self::close). A request after `close` builds a fresh client.
pub struct HttpClient {
    timeout: Duration,
    inner: RwLock<Option<Client>>,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            inner: RwLock::new(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the shared client, creating it if needed.
    ///
    /// `reqwest::Client` is reference counted, so the clone shares the pool.
    /// A client that cannot be built (TLS backend failure) is reported as
    /// [`RatesError::Network`] and nothing is stored, so the next call
    /// tries again.
    pub fn client(&self) -> Result<Client, RatesError> {
        if let Some(client) = self.read_inner().as_ref() {
            return Ok(client.clone());
        }

        let mut inner = self.write_inner();
        if let Some(client) = inner.as_ref() {
            return Ok(client.clone());
        }

        debug!("Creating HTTP client (timeout {:?})", self.timeout);
        let client = Client::builder().timeout(self.timeout).build()?;
        *inner = Some(client.clone());
        Ok(client)
    }

    /// Drop the shared client and its idle connections.
    pub fn close(&self) {
        if self.write_inner().take().is_some() {
            debug!("HTTP client closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.read_inner().is_some()
    }

    /// Send a request and decode a JSON body.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies are mapped
    /// to the matching [`RatesError`] variant for `provider`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &str,
        request: RequestBuilder,
    ) -> Result<T, RatesError> {
        let response = request
            .send()
            .await
            .map_err(|e| RatesError::from_transport(provider, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RatesError::RateLimited {
                provider: provider.to_string(),
            });
        }
        if !status.is_success() {
            return Err(RatesError::BadStatus {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RatesError::from_transport(provider, e))?;

        serde_json::from_str(&body).map_err(|e| RatesError::MalformedPayload {
            provider: provider.to_string(),
            message: e.to_string(),
        })
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, Option<Client>> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("HTTP client lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Option<Client>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("HTTP client lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_created_lazily() {
        let http = HttpClient::default();
        assert!(!http.is_open());

        assert!(http.client().is_ok());
        assert!(http.is_open());
    }

    #[test]
    fn test_client_errors_map_to_network() {
        let http = HttpClient::default();
        let client = http.client().unwrap();
        // A request that cannot be built surfaces as a penalised network error
        let error = client.get("not a url").build().unwrap_err();
        let error = RatesError::from(error);
        assert!(matches!(error, RatesError::Network(_)));
        assert_eq!(error.retry_class(), crate::errors::RetryClass::FailoverWithPenalty);
    }

    #[test]
    fn test_close_drops_client_and_reopens_on_demand() {
        let http = HttpClient::new(Duration::from_secs(2));
        http.client().unwrap();
        http.close();
        assert!(!http.is_open());

        // Closing twice is harmless
        http.close();

        http.client().unwrap();
        assert!(http.is_open());
        assert_eq!(http.timeout(), Duration::from_secs(2));
    }
}
