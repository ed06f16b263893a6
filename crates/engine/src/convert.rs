//! Currency conversion.
//!
//! Fiat amounts pivot through USD using one USD-based snapshot; every
//! currency the snapshot cannot price is taken from the static fallback
//! table instead, one currency at a time. Crypto amounts use the fixed
//! crypto price table.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use moneywords_rates::fallback::{self, PIVOT};
use moneywords_rates::{ExchangeRateService, RateSource, SourceSelector};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::catalog::CurrencyCatalog;

/// Which table priced a converted amount.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceTag {
    /// A rate snapshot (live provider or static fallback)
    Rates(RateSource),
    /// Crypto to crypto, from the crypto price table
    CryptoTable,
    /// Crypto to fiat, through the small fiat table attached to the crypto prices
    CryptoFallback,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTag::Rates(source) => write!(f, "{}", source),
            SourceTag::CryptoTable => write!(f, "crypto-table"),
            SourceTag::CryptoFallback => write!(f, "crypto+fallback"),
        }
    }
}

impl Serialize for SourceTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One line of a conversion result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConvertedAmount {
    pub currency: String,
    pub amount: Decimal,
    pub source: SourceTag,
}

/// Conversion results in the order the targets were requested.
///
/// Targets that could not be priced are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Conversions(Vec<ConvertedAmount>);

impl Conversions {
    fn push(&mut self, currency: &str, amount: Decimal, source: SourceTag) {
        if self.get(currency).is_none() {
            self.0.push(ConvertedAmount {
                currency: currency.to_string(),
                amount,
                source,
            });
        }
    }

    pub fn get(&self, currency: &str) -> Option<&ConvertedAmount> {
        self.0.iter().find(|c| c.currency == currency)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConvertedAmount> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ConvertedAmount> for Conversions {
    /// Collect lines, keeping the first one for a repeated currency.
    fn from_iter<I: IntoIterator<Item = ConvertedAmount>>(iter: I) -> Self {
        let mut conversions = Conversions::default();
        for line in iter {
            conversions.push(&line.currency, line.amount, line.source);
        }
        conversions
    }
}

impl IntoIterator for Conversions {
    type Item = ConvertedAmount;
    type IntoIter = std::vec::IntoIter<ConvertedAmount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Converts amounts between catalog currencies.
pub struct ConversionEngine {
    catalog: Arc<CurrencyCatalog>,
    rates: Arc<ExchangeRateService>,
}

fn positive(rate: Option<Decimal>) -> Option<Decimal> {
    rate.filter(|r| r.is_sign_positive() && !r.is_zero())
}

impl ConversionEngine {
    pub fn new(catalog: Arc<CurrencyCatalog>, rates: Arc<ExchangeRateService>) -> Self {
        Self { catalog, rates }
    }

    /// Convert `amount` of `from` into each of `targets`.
    ///
    /// Never fails; unknown origins give an empty result and unpriceable
    /// targets are left out.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        targets: &[String],
        selector: &SourceSelector,
    ) -> Conversions {
        let from = from.trim().to_uppercase();
        let targets: Vec<String> = targets.iter().map(|t| t.trim().to_uppercase()).collect();

        if self.catalog.is_crypto(&from) {
            self.convert_crypto(amount, &from, &targets)
        } else {
            self.convert_fiat(amount, &from, &targets, selector).await
        }
    }

    async fn convert_fiat(
        &self,
        amount: Decimal,
        from: &str,
        targets: &[String],
        selector: &SourceSelector,
    ) -> Conversions {
        let mut results = Conversions::default();
        let snapshot = self.rates.get_rates(PIVOT, selector).await;

        // A snapshot that fell back to another base cannot price against USD
        let usable = snapshot.base == PIVOT;
        let snapshot_rate = |code: &str| {
            if usable {
                positive(snapshot.rate(code))
            } else {
                None
            }
        };

        let mut tag = SourceTag::Rates(snapshot.source);
        let usd_amount = if from == PIVOT {
            amount
        } else if let Some(rate) = snapshot_rate(from) {
            match amount.checked_div(rate) {
                Some(value) => value,
                None => return results,
            }
        } else if let Some(rate) = positive(fallback::usd_rate(from)) {
            debug!("No live rate for origin {}, using fallback", from);
            tag = SourceTag::Rates(RateSource::Fallback);
            match amount.checked_div(rate) {
                Some(value) => value,
                None => return results,
            }
        } else {
            warn!("No rate at all for origin currency {}", from);
            return results;
        };

        for target in targets {
            let priced = if target == PIVOT {
                Some((usd_amount, tag))
            } else if let Some(rate) = snapshot_rate(target) {
                usd_amount.checked_mul(rate).map(|value| (value, tag))
            } else if let Some(rate) = positive(fallback::usd_rate(target)) {
                debug!("No live rate for {}, using fallback", target);
                usd_amount
                    .checked_mul(rate)
                    .map(|value| (value, SourceTag::Rates(RateSource::Fallback)))
            } else {
                None
            };

            match priced {
                Some((value, source)) => results.push(target, value, source),
                None => debug!("No rate for target currency {}, omitted", target),
            }
        }

        results
    }

    fn convert_crypto(&self, amount: Decimal, from: &str, targets: &[String]) -> Conversions {
        let mut results = Conversions::default();
        let Some(from_price) = positive(fallback::crypto_usd_price(from)) else {
            warn!("No crypto price for {}", from);
            return results;
        };
        let Some(usd_amount) = amount.checked_mul(from_price) else {
            return results;
        };

        for target in targets {
            let priced = if let Some(price) = positive(fallback::crypto_usd_price(target)) {
                usd_amount
                    .checked_div(price)
                    .map(|value| (value, SourceTag::CryptoTable))
            } else if self.catalog.is_fiat(target) {
                positive(fallback::crypto_fiat_rate(target))
                    .and_then(|rate| usd_amount.checked_mul(rate))
                    .map(|value| (value, SourceTag::CryptoFallback))
            } else {
                None
            };

            match priced {
                Some((value, source)) => results.push(target, value, source),
                None => debug!("No crypto rate for target {}, omitted", target),
            }
        }

        results
    }
}
