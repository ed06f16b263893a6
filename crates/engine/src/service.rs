use std::sync::Arc;

use log::debug;
use moneywords_rates::{
    ExchangeRateService, ProviderHealth, RateSnapshot, RatesConfig, SourceSelector,
};
use rust_decimal::Decimal;

use crate::catalog::CurrencyCatalog;
use crate::convert::{ConversionEngine, Conversions};
use crate::errors::CatalogError;
use crate::extract::{Extractor, MonetaryToken, ProcessingMode};
use crate::format::{format_math_result, render_report, Appearance};

/// Options for [`CurrencyService::convert_text`].
#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    pub mode: ProcessingMode,
    pub selector: SourceSelector,
    pub appearance: Appearance,
    /// Append the pricing table to every line
    pub debug: bool,
}

/// Text-to-money facade: extraction, conversion and rates behind one
/// long-lived object.
pub struct CurrencyService {
    extractor: Extractor,
    converter: ConversionEngine,
    rates: Arc<ExchangeRateService>,
}

impl CurrencyService {
    /// Built-in catalog and the default providers configured by `config`.
    pub fn new(config: &RatesConfig) -> Result<Self, CatalogError> {
        let rates = Arc::new(ExchangeRateService::new(config));
        Self::with_parts(CurrencyCatalog::builtin(), rates)
    }

    pub fn with_parts(
        catalog: Arc<CurrencyCatalog>,
        rates: Arc<ExchangeRateService>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            extractor: Extractor::new(Arc::clone(&catalog))?,
            converter: ConversionEngine::new(catalog, Arc::clone(&rates)),
            rates,
        })
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        self.extractor.catalog()
    }

    /// Amount and currency in `text`, with every extraction stage enabled.
    pub fn extract_number_and_currency(&self, text: &str) -> Option<MonetaryToken> {
        self.extract_with_mode(text, ProcessingMode::Advanced)
    }

    pub fn extract_with_mode(&self, text: &str, mode: ProcessingMode) -> Option<MonetaryToken> {
        self.extractor.extract_with_mode(text, mode)
    }

    /// Evaluate the arithmetic in `text` and render the result, e.g. `$100`.
    ///
    /// Without a recognisable currency the bare number is returned.
    pub fn calculate(&self, text: &str) -> Option<String> {
        let math = self.extractor.math();
        if let Some((value, code)) = math.extract(self.catalog(), text) {
            return Some(format_math_result(self.catalog(), value, Some(&code)));
        }
        let (value, _) = math.parse_and_evaluate(&text.trim().to_lowercase())?;
        Some(format_math_result(self.catalog(), value, None))
    }

    pub async fn convert_currency(
        &self,
        amount: Decimal,
        from: &str,
        targets: &[String],
        selector: &SourceSelector,
    ) -> Conversions {
        self.converter.convert(amount, from, targets, selector).await
    }

    pub async fn get_exchange_rates(
        &self,
        base: &str,
        selector: &SourceSelector,
    ) -> Arc<RateSnapshot> {
        self.rates.get_rates(base, selector).await
    }

    /// Extract, convert into `targets` and render the report.
    ///
    /// `None` when nothing could be extracted or nothing could be priced.
    /// The origin currency is dropped from the targets.
    pub async fn convert_text(
        &self,
        text: &str,
        targets: &[String],
        options: &ReportOptions,
    ) -> Option<String> {
        let token = self.extract_with_mode(text, options.mode)?;
        let targets: Vec<String> = targets
            .iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| *t != token.currency_code)
            .collect();

        let conversions = self
            .convert_currency(token.amount, &token.currency_code, &targets, &options.selector)
            .await;
        if conversions.is_empty() {
            debug!(
                "Nothing priced for {} {}",
                token.amount, token.currency_code
            );
            return None;
        }

        Some(render_report(
            self.catalog(),
            &token,
            &conversions,
            &options.appearance,
            options.debug,
        ))
    }

    pub fn provider_health(&self) -> Vec<ProviderHealth> {
        self.rates.provider_health()
    }

    pub fn reset_provider(&self, id: &str) -> bool {
        self.rates.reset_provider(id)
    }

    /// Release the shared HTTP client.
    pub fn close(&self) {
        self.rates.close();
    }
}
