use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::types::Currency;

/// A single rate as delivered by a provider.
///
/// Some providers quote rates as JSON strings rather than numbers, and a
/// defective payload may carry anything. The raw text is kept and coerced
/// at the point of use so one bad entry never poisons the whole table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RateValue {
    /// A numeric rate.
    Number(Decimal),
    /// A non-numeric JSON value, kept verbatim.
    Text(String),
}

impl RateValue {
    /// Convert a raw JSON value from a provider payload.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => {
                let repr = n.to_string();
                parse_decimal(&repr)
                    .or_else(|| n.as_f64().and_then(Decimal::from_f64))
                    .map(RateValue::Number)
                    .unwrap_or(RateValue::Text(repr))
            }
            serde_json::Value::String(s) => RateValue::Text(s.clone()),
            other => RateValue::Text(other.to_string()),
        }
    }

    /// Numeric value of this rate, parsing text when needed.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RateValue::Number(value) => Some(*value),
            RateValue::Text(text) => parse_decimal(text),
        }
    }
}

impl From<Decimal> for RateValue {
    fn from(value: Decimal) -> Self {
        RateValue::Number(value)
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Code -> rate, relative to some base currency.
pub type RateTable = HashMap<Currency, RateValue>;

/// Where a snapshot came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RateSource {
    /// A live provider, by id.
    Provider(&'static str),
    /// The static fallback table.
    Fallback,
}

impl RateSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RateSource::Fallback)
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::Provider(id) => write!(f, "{}", id),
            RateSource::Fallback => write!(f, "fallback"),
        }
    }
}

impl Serialize for RateSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A full rate table for one base currency.
#[derive(Clone, Debug, Serialize)]
pub struct RateSnapshot {
    /// Base currency every rate is expressed against
    pub base: Currency,

    /// Units of each currency per one unit of `base`
    pub rates: RateTable,

    /// Provenance of the table
    pub source: RateSource,

    /// When the table was obtained
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    /// Create a snapshot stamped with the current time.
    ///
    /// If the base currency appears in the table its rate is pinned to 1.
    pub fn new(base: impl Into<Currency>, mut rates: RateTable, source: RateSource) -> Self {
        let base = base.into();
        if let Some(own) = rates.get_mut(&base) {
            *own = RateValue::Number(Decimal::ONE);
        }

        Self {
            base,
            rates,
            source,
            fetched_at: Utc::now(),
        }
    }

    /// Numeric rate for `code`, if present and coercible.
    pub fn rate(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).and_then(RateValue::to_decimal)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
