//! National Bank of the Republic of Belarus provider.
//!
//! The NBRB publishes official rates as BYN per `scale` units of each
//! currency. No API key is required. Tables are re-based locally:
//!
//! ```text
//! byn_per_unit[X] = officialRate[X] / scale[X]      (BYN itself = 1)
//! rate[X]         = byn_per_unit[base] / byn_per_unit[X]
//! ```
//!
//! so that `rate[X]` is units of X per one unit of `base`, matching every
//! other provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::RatesError;
use crate::models::{RateTable, RateValue};
use crate::provider::{HttpClient, RateProvider};

/// Provider ID constant
pub const PROVIDER_ID: &str = "nbrb";

/// Default endpoint for the daily rate list
pub const DEFAULT_BASE_URL: &str = "https://api.nbrb.by/exrates/rates?periodicity=0";

/// Anchor currency of every NBRB quote
const ANCHOR: &str = "BYN";

/// One entry of the daily rate list.
///
/// Both the camelCase and the legacy `Cur_*` field names are accepted.
#[derive(Debug, Deserialize)]
struct NbrbRate {
    #[serde(rename = "abbreviation", alias = "Cur_Abbreviation")]
    abbreviation: String,
    #[serde(rename = "officialRate", alias = "Cur_OfficialRate")]
    official_rate: Option<Decimal>,
    #[serde(rename = "scale", alias = "Cur_Scale", default = "default_scale")]
    scale: Decimal,
}

fn default_scale() -> Decimal {
    Decimal::ONE
}

pub struct NbrbProvider {
    http: Arc<HttpClient>,
    url: String,
}

impl NbrbProvider {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_url(http: Arc<HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// BYN per one unit of each listed currency.
    fn byn_per_unit(entries: Vec<NbrbRate>) -> HashMap<String, Decimal> {
        let mut per_unit: HashMap<String, Decimal> = entries
            .into_iter()
            .filter_map(|entry| {
                let rate = entry.official_rate.filter(|rate| !rate.is_zero())?;
                let per_unit = rate.checked_div(entry.scale)?;
                Some((entry.abbreviation.to_uppercase(), per_unit))
            })
            .collect();
        per_unit.insert(ANCHOR.to_string(), Decimal::ONE);
        per_unit
    }

    /// Re-base a BYN-anchored list onto `base`.
    fn rebase(entries: Vec<NbrbRate>, base: &str) -> Result<RateTable, RatesError> {
        let per_unit = Self::byn_per_unit(entries);
        let base_in_byn = per_unit
            .get(base)
            .copied()
            .ok_or_else(|| RatesError::UnsupportedBase {
                provider: PROVIDER_ID.to_string(),
                base: base.to_string(),
            })?;

        Ok(per_unit
            .into_iter()
            .filter_map(|(code, byn)| {
                base_in_byn
                    .checked_div(byn)
                    .map(|rate| (code, RateValue::Number(rate.normalize())))
            })
            .collect())
    }
}

#[async_trait]
impl RateProvider for NbrbProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RatesError> {
        debug!("Fetching {} rates from {}", base, PROVIDER_ID);
        let request = self.http.client()?.get(&self.url);

        let entries: Vec<NbrbRate> = self.http.get_json(PROVIDER_ID, request).await?;
        if entries.is_empty() {
            return Ok(RateTable::new());
        }

        Self::rebase(entries, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(code: &str, rate: Decimal, scale: Decimal) -> NbrbRate {
        NbrbRate {
            abbreviation: code.to_string(),
            official_rate: Some(rate),
            scale,
        }
    }

    fn sample() -> Vec<NbrbRate> {
        vec![
            entry("USD", dec!(3.2), dec!(1)),
            entry("EUR", dec!(3.5), dec!(1)),
            entry("RUB", dec!(3.5), dec!(100)),
        ]
    }

    #[test]
    fn test_rebase_to_byn() {
        let table = NbrbProvider::rebase(sample(), "BYN").unwrap();
        assert_eq!(table["BYN"].to_decimal(), Some(dec!(1)));
        assert_eq!(table["USD"].to_decimal(), Some(dec!(0.3125)));
        // 100 RUB = 3.5 BYN, so 1 BYN buys 100 / 3.5 RUB
        let rub = table["RUB"].to_decimal().unwrap();
        assert!((rub - dec!(28.5714285714)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_rebase_to_usd() {
        let table = NbrbProvider::rebase(sample(), "USD").unwrap();
        assert_eq!(table["USD"].to_decimal(), Some(dec!(1)));
        assert_eq!(table["BYN"].to_decimal(), Some(dec!(3.2)));
        let eur = table["EUR"].to_decimal().unwrap();
        assert!((eur - dec!(0.9142857)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_rebase_unknown_base() {
        let err = NbrbProvider::rebase(sample(), "XYZ").unwrap_err();
        assert!(matches!(err, RatesError::UnsupportedBase { .. }));
    }

    #[test]
    fn test_zero_and_missing_rates_are_dropped() {
        let mut entries = sample();
        entries.push(entry("JPY", dec!(0), dec!(100)));
        entries.push(NbrbRate {
            abbreviation: "CNY".to_string(),
            official_rate: None,
            scale: dec!(10),
        });

        let table = NbrbProvider::rebase(entries, "BYN").unwrap();
        assert!(!table.contains_key("JPY"));
        assert!(!table.contains_key("CNY"));
    }

    #[test]
    fn test_zero_scale_is_dropped() {
        let mut entries = sample();
        entries.push(entry("PLN", dec!(8.0), dec!(0)));

        let table = NbrbProvider::rebase(entries, "USD").unwrap();
        assert!(!table.contains_key("PLN"));
        assert_eq!(table["BYN"].to_decimal(), Some(dec!(3.2)));
    }

    #[test]
    fn test_legacy_field_names() {
        let raw = r#"[{"Cur_Abbreviation":"PLN","Cur_OfficialRate":8.0,"Cur_Scale":10}]"#;
        let entries: Vec<NbrbRate> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries[0].abbreviation, "PLN");
        assert_eq!(entries[0].scale, dec!(10));

        let raw = r#"[{"abbreviation":"PLN","officialRate":0.8}]"#;
        let entries: Vec<NbrbRate> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries[0].scale, dec!(1));
    }
}
