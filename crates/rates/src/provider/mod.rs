//! Exchange rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `RateProvider` trait that all providers implement
//! - The shared, lazily created `HttpClient`
//! - Concrete providers (CurrencyFreaks, ExchangeRate-API, NBRB)
//!
//! Every provider returns a table relative to the requested base currency.
//! Re-basing for providers anchored to a fixed currency happens inside the
//! adapter and never leaks into the shared snapshot shape.

mod http;
mod traits;

pub mod currency_freaks;
pub mod exchange_rate_api;
pub mod nbrb;

pub use http::HttpClient;
pub use traits::RateProvider;

use crate::models::{RateTable, RateValue};

/// Build a rate table from a decoded JSON object, uppercasing codes.
pub(crate) fn into_table(raw: std::collections::HashMap<String, serde_json::Value>) -> RateTable {
    raw.into_iter()
        .map(|(code, value)| (code.to_uppercase(), RateValue::from_json(&value)))
        .collect()
}
