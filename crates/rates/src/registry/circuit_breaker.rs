//! Per-provider failure counting.
//!
//! A provider's circuit is **Open** once its consecutive failure count
//! reaches `max_failures`, and **Closed** otherwise. Open circuits are
//! skipped by `auto` requests. There is no timed recovery: the count only
//! goes back to zero after a success (typically a pinned request, which
//! bypasses the breaker) or a manual reset.
//!
//! State is in-memory and lives for the process lifetime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

/// Default number of consecutive failures before a provider is skipped.
pub const DEFAULT_MAX_FAILURES: u32 = 3;

/// Circuit state derived from the failure count.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitState {
    /// Requests are allowed.
    Closed,
    /// The provider is skipped in `auto` mode.
    Open,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
        }
    }
}

#[derive(Debug, Default)]
struct Circuit {
    failure_count: u32,
    last_failure: Option<DateTime<Utc>>,
}

/// Health of a single provider, as reported by [`CircuitBreaker::health`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    pub provider: String,
    pub failure_count: u32,
    pub max_failures: u32,
    pub state: CircuitState,
    pub last_failure: Option<DateTime<Utc>>,
}

/// Thread-safe failure counters keyed by provider id.
///
/// A single coarse mutex guards every counter; contention is negligible
/// next to the network calls it sits beside.
pub struct CircuitBreaker {
    circuits: Mutex<HashMap<String, Circuit>>,
    max_failures: u32,
}

impl CircuitBreaker {
    pub fn new(max_failures: u32) -> Self {
        Self {
            circuits: Mutex::new(HashMap::new()),
            max_failures: max_failures.max(1),
        }
    }

    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    /// Lock the circuits mutex, recovering from poison if necessary.
    ///
    /// A poisoned lock can at worst hold a stale counter, which is preferable
    /// to panicking on every later request.
    fn lock_circuits(&self) -> MutexGuard<'_, HashMap<String, Circuit>> {
        self.circuits.lock().unwrap_or_else(|poisoned| {
            warn!("Circuit breaker mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Whether `auto` requests may use this provider.
    pub fn is_allowed(&self, provider: &str) -> bool {
        self.failure_count(provider) < self.max_failures
    }

    /// Record a successful fetch, resetting the failure count to 0.
    pub fn record_success(&self, provider: &str) {
        let mut circuits = self.lock_circuits();
        let circuit = circuits.entry(provider.to_string()).or_default();

        if circuit.failure_count >= self.max_failures {
            info!(
                "Circuit breaker: closing circuit for '{}' after success",
                provider
            );
        } else if circuit.failure_count > 0 {
            debug!(
                "Circuit breaker: success for '{}', failure count reset",
                provider
            );
        }
        circuit.failure_count = 0;
    }

    /// Record a failed fetch.
    pub fn record_failure(&self, provider: &str) {
        let mut circuits = self.lock_circuits();
        let circuit = circuits.entry(provider.to_string()).or_default();

        circuit.failure_count = circuit.failure_count.saturating_add(1);
        circuit.last_failure = Some(Utc::now());

        if circuit.failure_count == self.max_failures {
            info!(
                "Circuit breaker: opening circuit for '{}' after {} failures",
                provider, circuit.failure_count
            );
        } else {
            debug!(
                "Circuit breaker: failure for '{}' ({}/{})",
                provider, circuit.failure_count, self.max_failures
            );
        }
    }

    pub fn state(&self, provider: &str) -> CircuitState {
        if self.is_allowed(provider) {
            CircuitState::Closed
        } else {
            CircuitState::Open
        }
    }

    pub fn failure_count(&self, provider: &str) -> u32 {
        self.lock_circuits()
            .get(provider)
            .map(|c| c.failure_count)
            .unwrap_or(0)
    }

    /// Reset a provider's counter to 0.
    pub fn reset(&self, provider: &str) {
        let mut circuits = self.lock_circuits();
        if let Some(circuit) = circuits.get_mut(provider) {
            info!(
                "Circuit breaker: manually resetting circuit for '{}'",
                provider
            );
            *circuit = Circuit::default();
        }
    }

    /// Health of the given providers, in the order given.
    ///
    /// Providers that never failed are reported with a zero count.
    pub fn health<'a>(&self, providers: impl IntoIterator<Item = &'a str>) -> Vec<ProviderHealth> {
        let circuits = self.lock_circuits();
        providers
            .into_iter()
            .map(|provider| {
                let (failure_count, last_failure) = circuits
                    .get(provider)
                    .map(|c| (c.failure_count, c.last_failure))
                    .unwrap_or((0, None));
                ProviderHealth {
                    provider: provider.to_string(),
                    failure_count,
                    max_failures: self.max_failures,
                    state: if failure_count >= self.max_failures {
                        CircuitState::Open
                    } else {
                        CircuitState::Closed
                    },
                    last_failure,
                }
            })
            .collect()
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILURES)
    }
}
