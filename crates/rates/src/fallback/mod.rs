//! Static fallback rates.
//!
//! Loads `usd_rates.json` and `crypto.json` at compile time via
//! `include_str!` and parses them once via `lazy_static`.
//!
//! - `usd_rates.json`: units of each fiat and crypto currency per 1 USD,
//!   used whenever no live provider can answer.
//! - `crypto.json`: USD prices of crypto assets plus a small fiat table,
//!   used for crypto-origin conversions.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{RateSnapshot, RateSource, RateTable, RateValue};

/// Pivot currency of the fallback table
pub const PIVOT: &str = "USD";

#[derive(Debug, Deserialize)]
struct UsdRatesFile {
    fiat: HashMap<String, serde_json::Value>,
    crypto: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CryptoFile {
    usd_prices: HashMap<String, serde_json::Value>,
    fiat_per_usd: HashMap<String, serde_json::Value>,
}

struct FallbackTables {
    /// Units per 1 USD, fiat and crypto combined
    usd_rates: HashMap<String, Decimal>,
    /// USD price of 1 unit of each crypto asset
    crypto_usd_prices: HashMap<String, Decimal>,
    /// Units of a handful of fiat currencies per 1 USD, for crypto conversions
    crypto_fiat_per_usd: HashMap<String, Decimal>,
}

lazy_static! {
    static ref TABLES: FallbackTables = FallbackTables::load();
}

fn to_decimals(raw: HashMap<String, serde_json::Value>) -> HashMap<String, Decimal> {
    raw.into_iter()
        .filter_map(|(code, value)| {
            RateValue::from_json(&value)
                .to_decimal()
                .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
                .map(|rate| (code.to_uppercase(), rate))
        })
        .collect()
}

impl FallbackTables {
    fn load() -> Self {
        let usd: UsdRatesFile = serde_json::from_str(include_str!("usd_rates.json"))
            .expect("usd_rates.json must be valid");
        let crypto: CryptoFile =
            serde_json::from_str(include_str!("crypto.json")).expect("crypto.json must be valid");

        let mut usd_rates = to_decimals(usd.fiat);
        usd_rates.extend(to_decimals(usd.crypto));

        Self {
            usd_rates,
            crypto_usd_prices: to_decimals(crypto.usd_prices),
            crypto_fiat_per_usd: to_decimals(crypto.fiat_per_usd),
        }
    }
}

/// Units of `code` per 1 USD from the static table.
pub fn usd_rate(code: &str) -> Option<Decimal> {
    TABLES.usd_rates.get(code).copied()
}

/// USD price of one unit of a crypto asset.
pub fn crypto_usd_price(code: &str) -> Option<Decimal> {
    TABLES.crypto_usd_prices.get(code).copied()
}

/// Units of a fiat currency per 1 USD, as used for crypto conversions.
pub fn crypto_fiat_rate(code: &str) -> Option<Decimal> {
    TABLES.crypto_fiat_per_usd.get(code).copied()
}

/// Build a snapshot from the static table, re-based onto `base`.
///
/// An unknown base cannot be re-based; the USD table is returned instead
/// with its base reported as USD.
pub fn fallback_snapshot(base: &str) -> RateSnapshot {
    let base_rate = match usd_rate(base) {
        Some(rate) => rate,
        None => {
            warn!(
                "No fallback rate for base currency {}, returning {} table",
                base, PIVOT
            );
            return RateSnapshot::new(PIVOT, table_divided_by(Decimal::ONE), RateSource::Fallback);
        }
    };

    RateSnapshot::new(base, table_divided_by(base_rate), RateSource::Fallback)
}

fn table_divided_by(base_rate: Decimal) -> RateTable {
    TABLES
        .usd_rates
        .iter()
        .filter_map(|(code, rate)| {
            rate.checked_div(base_rate)
                .map(|value| (code.clone(), RateValue::Number(value)))
        })
        .collect()
}
