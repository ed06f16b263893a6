use std::sync::Arc;

use anyhow::Context;
use moneywords_engine::{CurrencyCatalog, CurrencyService};
use moneywords_rates::ExchangeRateService;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub fn init_tracing() {
    let log_format = std::env::var("MONEYWORDS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output stays machine-readable
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_service(config: &Config) -> anyhow::Result<CurrencyService> {
    let catalog = match &config.catalog_path {
        Some(path) => Arc::new(
            CurrencyCatalog::from_path(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        ),
        None => CurrencyCatalog::builtin(),
    };
    tracing::debug!(
        "Providers configured: currencyfreaks={}, exchangerate={}",
        config.rates.currency_freaks_api_key.is_some(),
        config.rates.exchange_rate_api_key.is_some()
    );

    let rates = Arc::new(ExchangeRateService::new(&config.rates));
    let service = CurrencyService::with_parts(catalog, rates)?;
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneywords_rates::RatesConfig;
    use std::io::Write;

    fn config(catalog_path: Option<std::path::PathBuf>) -> Config {
        Config {
            rates: RatesConfig::default(),
            catalog_path,
            default_targets: vec!["EUR".to_string()],
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let service = build_service(&config(None)).unwrap();
        assert!(service.catalog().is_fiat("USD"));
    }

    #[test]
    fn test_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fiat":{{"USD":"Dollar","EUR":"Euro"}},"crypto":{{}},"aliases":{{"dollars":"USD"}}}}"#
        )
        .unwrap();

        let service = build_service(&config(Some(file.path().to_path_buf()))).unwrap();
        assert!(!service.catalog().is_fiat("RUB"));
        let token = service.extract_number_and_currency("5 dollars").unwrap();
        assert_eq!(token.currency_code, "USD");
    }

    #[test]
    fn test_invalid_catalog_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fiat":{{"USD":"Dollar"}},"crypto":{{"USD":"Fake"}}}}"#).unwrap();

        let err = build_service(&config(Some(file.path().to_path_buf()))).err().unwrap();
        assert!(err.to_string().contains("Failed to load catalog"));
    }
}
