//! Error types and retry classification for the rates crate.
//!
//! This module provides:
//! - [`RatesError`]: The error enum for every provider and registry operation
//! - [`RetryClass`]: Classification for determining circuit breaker penalties

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching exchange rates.
///
/// These never leave [`ExchangeRateService`](crate::ExchangeRateService); they
/// are classified via [`retry_class`](Self::retry_class) and then absorbed.
#[derive(Error, Debug)]
pub enum RatesError {
    /// The provider has no credentials configured.
    #[error("Provider not configured: {provider}")]
    NotConfigured {
        /// The provider missing its API key
        provider: String,
    },

    /// The provider answered successfully but returned no rates.
    #[error("Empty payload: {provider}")]
    EmptyPayload {
        /// The provider that returned an empty table
        provider: String,
    },

    /// The provider does not quote rates against the requested base.
    #[error("Unsupported base currency {base} for provider {provider}")]
    UnsupportedBase {
        /// The provider that rejected the base
        provider: String,
        /// The requested base currency
        base: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-2xx status.
    #[error("Bad status from {provider}: {status}")]
    BadStatus {
        /// The provider that returned the status
        provider: String,
        /// HTTP status code
        status: u16,
    },

    /// The provider returned a body that could not be decoded.
    #[error("Malformed payload from {provider}: {message}")]
    MalformedPayload {
        /// The provider that returned the payload
        provider: String,
        /// Decoder message
        message: String,
    },

    /// The provider reported an error inside a 2xx response.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A pinned selector named a provider that is not registered.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Every eligible provider was tried and none produced rates.
    #[error("All providers failed")]
    AllProvidersFailed,

    /// A transport error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl RatesError {
    /// Build the error for a failed `send()`, separating timeouts from other
    /// transport failures.
    pub fn from_transport(provider: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network(error)
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneywords_rates::errors::{RatesError, RetryClass};
    ///
    /// let error = RatesError::Timeout { provider: "nbrb".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::FailoverWithPenalty);
    ///
    /// let error = RatesError::NotConfigured { provider: "currencyfreaks".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::NextProvider);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // The provider failed - count it
            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::BadStatus { .. }
            | Self::MalformedPayload { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => RetryClass::FailoverWithPenalty,

            // The provider cannot serve this request - skip without penalty
            Self::NotConfigured { .. }
            | Self::EmptyPayload { .. }
            | Self::UnsupportedBase { .. } => RetryClass::NextProvider,

            Self::UnknownProvider(_) | Self::AllProvidersFailed => RetryClass::Never,
        }
    }
}
