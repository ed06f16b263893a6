//! Provider registry module.
//!
//! This module provides orchestration for rate providers, including:
//! - Provider registration and priority ordering
//! - Source selector handling (`auto` vs. a pinned provider)
//! - Per-provider failure counting

mod circuit_breaker;
mod registry;

pub use circuit_breaker::{CircuitBreaker, CircuitState, ProviderHealth, DEFAULT_MAX_FAILURES};
pub use registry::ProviderRegistry;
