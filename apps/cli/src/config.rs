use std::path::PathBuf;

use moneywords_rates::RatesConfig;

const DEFAULT_TARGETS: &str = "USD,EUR,RUB,UAH,BYN,KZT,BTC,ETH,TON";

/// Process configuration, read from `MONEYWORDS_*` environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub rates: RatesConfig,
    /// Replacement currency catalog; the built-in one when unset
    pub catalog_path: Option<PathBuf>,
    /// Conversion targets when `--to` is not given
    pub default_targets: Vec<String>,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    var(name).and_then(|v| v.parse().ok()).unwrap_or(default)
}

pub fn split_codes(list: &str) -> Vec<String> {
    list.split(',')
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = RatesConfig::default();
        let rates = RatesConfig {
            currency_freaks_api_key: var("MONEYWORDS_CURRENCYFREAKS_API_KEY"),
            currency_freaks_base_url: var("MONEYWORDS_CURRENCYFREAKS_URL")
                .unwrap_or(defaults.currency_freaks_base_url),
            exchange_rate_api_key: var("MONEYWORDS_EXCHANGERATE_API_KEY"),
            exchange_rate_base_url: var("MONEYWORDS_EXCHANGERATE_URL")
                .unwrap_or(defaults.exchange_rate_base_url),
            nbrb_base_url: var("MONEYWORDS_NBRB_URL").unwrap_or(defaults.nbrb_base_url),
            request_timeout_secs: parsed(
                "MONEYWORDS_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            cache_ttl_secs: parsed("MONEYWORDS_CACHE_TTL_SECS", defaults.cache_ttl_secs),
            max_failures: parsed("MONEYWORDS_MAX_FAILURES", defaults.max_failures),
        };

        Self {
            rates,
            catalog_path: var("MONEYWORDS_CATALOG").map(PathBuf::from),
            default_targets: split_codes(
                &var("MONEYWORDS_TARGETS").unwrap_or_else(|| DEFAULT_TARGETS.to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_codes() {
        assert_eq!(split_codes(" usd, eur ,,btc"), vec!["USD", "EUR", "BTC"]);
        assert!(split_codes("").is_empty());
    }

    #[test]
    fn test_default_targets() {
        assert_eq!(split_codes(DEFAULT_TARGETS).len(), 9);
    }
}
