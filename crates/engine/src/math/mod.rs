//! Arithmetic inside monetary text: `"(20 + 5) * 4 dollars"`.
//!
//! [`MathExtractor`] splits a currency token off the expression, evaluates
//! what is left via [`evaluate`] and resolves the currency against the
//! catalog, falling back to scanning the whole text when the split-off
//! token is not a currency.

mod eval;

pub use eval::evaluate;

use log::debug;
use regex::Regex;
use rust_decimal::Decimal;

use crate::catalog::CurrencyCatalog;
use crate::errors::CatalogError;
use crate::resolver::is_alias_letter;

const OPERATORS: &[char] = &['+', '-', '*', '/', '×', '÷', '⋅', '–', '—'];

/// True when `text` has both an arithmetic operator and a digit.
pub fn contains_math(text: &str) -> bool {
    text.contains(OPERATORS) && text.chars().any(|c| c.is_ascii_digit())
}

/// An expression with the currency token split off.
#[derive(Clone, Debug, PartialEq)]
pub struct MathExpression {
    pub expression: String,
    pub token: Option<String>,
}

/// Splits and evaluates arithmetic expressions carrying a currency.
#[derive(Debug)]
pub struct MathExtractor {
    trailing: Vec<Regex>,
    leading: Vec<Regex>,
    embedded: Vec<Regex>,
}

fn is_bare_suffix(token: &str) -> bool {
    token.chars().count() <= 2 && token.chars().all(|c| matches!(c, 'k' | 'к'))
}

fn compile(patterns: Vec<String>) -> Result<Vec<Regex>, CatalogError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(CatalogError::from))
        .collect()
}

impl MathExtractor {
    pub fn new(catalog: &CurrencyCatalog) -> Result<Self, CatalogError> {
        let symbols = catalog.symbol_pattern();

        let mut trailing = Vec::new();
        let mut leading = Vec::new();
        let mut embedded = Vec::new();
        if let Some(symbols) = &symbols {
            trailing.push(format!(r"({symbols})\s*$"));
            leading.push(format!(r"^({symbols})\s*"));
            embedded.push(format!(r"\s+({symbols})\s+"));
        }
        trailing.push(r"([a-z]+)\s*$".to_string());
        trailing.push(r"([а-яё]+)\s*$".to_string());
        leading.push(r"^([a-z]+|[а-яё]+)\s+".to_string());
        embedded.push(r"\s+([a-z]{3})\s+".to_string());

        Ok(Self {
            trailing: compile(trailing)?,
            leading: compile(leading)?,
            embedded: compile(embedded)?,
        })
    }

    /// Separate the currency token from the arithmetic.
    ///
    /// The token is looked for at the end, then at the start, then between
    /// two halves of the expression. In the last case the halves are joined
    /// as-is, with nothing put back where the token was. Returns `None`
    /// when what remains is not arithmetic.
    pub fn split(&self, text: &str) -> Option<MathExpression> {
        let text = text.trim();
        if !contains_math(text) {
            return None;
        }

        let split = self
            .split_trailing(text)
            .or_else(|| self.split_leading(text))
            .or_else(|| self.split_embedded(text))
            .unwrap_or_else(|| MathExpression {
                expression: text.to_string(),
                token: None,
            });

        contains_math(&split.expression).then_some(split)
    }

    fn split_trailing(&self, text: &str) -> Option<MathExpression> {
        for regex in &self.trailing {
            let Some(caps) = regex.captures(text) else {
                continue;
            };
            let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // "3к" at the end is a magnitude, not a currency
            let after_digit = text[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit());
            if after_digit && is_bare_suffix(token.as_str()) {
                continue;
            }
            return Some(MathExpression {
                expression: text[..whole.start()].trim().to_string(),
                token: Some(token.as_str().to_string()),
            });
        }
        None
    }

    fn split_leading(&self, text: &str) -> Option<MathExpression> {
        self.leading.iter().find_map(|regex| {
            let caps = regex.captures(text)?;
            let (whole, token) = (caps.get(0)?, caps.get(1)?);
            Some(MathExpression {
                expression: text[whole.end()..].trim().to_string(),
                token: Some(token.as_str().to_string()),
            })
        })
    }

    fn split_embedded(&self, text: &str) -> Option<MathExpression> {
        self.embedded.iter().find_map(|regex| {
            let caps = regex.captures(text)?;
            let (whole, token) = (caps.get(0)?, caps.get(1)?);
            let joined = format!("{}{}", &text[..whole.start()], &text[whole.end()..]);
            Some(MathExpression {
                expression: joined.trim().to_string(),
                token: Some(token.as_str().to_string()),
            })
        })
    }

    /// Split `text` and evaluate the arithmetic part.
    ///
    /// The token is returned unresolved.
    pub fn parse_and_evaluate(&self, text: &str) -> Option<(Decimal, Option<String>)> {
        let split = self.split(text)?;
        let value = evaluate(&split.expression)?;
        Some((value, split.token))
    }

    /// Evaluate the arithmetic in `text` and find the currency it is in.
    ///
    /// The currency is taken from, in order: the split-off token, the
    /// longest multi-letter alias standing as a whole word anywhere in the
    /// text, the first currency glyph in the text, a bare code standing as
    /// a whole word. If none applies the result is `None` even though a
    /// value was computed.
    pub fn extract(&self, catalog: &CurrencyCatalog, text: &str) -> Option<(Decimal, String)> {
        let lowered = text.trim().to_lowercase();
        let (value, token) = self.parse_and_evaluate(&lowered)?;

        let code = token
            .as_deref()
            .and_then(|token| catalog.resolve(token))
            .or_else(|| find_alias(catalog, &lowered))
            .or_else(|| lowered.chars().find_map(|c| catalog.symbol(c)))
            .or_else(|| find_code(catalog, &lowered));

        match code {
            Some(code) => {
                debug!("Math expression evaluated to {} {}", value, code);
                Some((value, code.to_string()))
            }
            None => {
                debug!("Math expression evaluated to {} with no currency", value);
                None
            }
        }
    }
}

/// Whether `needle` occurs in `haystack` delimited by characters that fail
/// `is_letter` (or the ends of the text).
pub(crate) fn contains_word(haystack: &str, needle: &str, is_letter: fn(char) -> bool) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(is_letter) && !after.is_some_and(is_letter)
    })
}

fn find_alias<'c>(catalog: &'c CurrencyCatalog, text: &str) -> Option<&'c str> {
    catalog
        .aliases_longest_first()
        .filter(|(alias, _)| alias.chars().count() > 1)
        .find(|(alias, _)| contains_word(text, alias, is_alias_letter))
        .map(|(_, code)| code)
}

fn find_code<'c>(catalog: &'c CurrencyCatalog, text: &str) -> Option<&'c str> {
    catalog
        .fiat_codes()
        .chain(catalog.crypto_codes())
        .find(|code| contains_word(text, &code.to_lowercase(), |c| c.is_ascii_alphabetic()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn extractor() -> (std::sync::Arc<CurrencyCatalog>, MathExtractor) {
        let catalog = CurrencyCatalog::builtin();
        let extractor = MathExtractor::new(&catalog).unwrap();
        (catalog, extractor)
    }

    #[test]
    fn test_contains_math() {
        assert!(contains_math("2 + 2"));
        assert!(contains_math("10×3"));
        assert!(!contains_math("(100)"));
        assert!(!contains_math("plus + minus"));
        assert!(!contains_math("100 usd"));
    }

    #[test]
    fn test_trailing_token() {
        let (_, extractor) = extractor();
        let split = extractor.split("(20 + 5) * 4 dollars").unwrap();
        assert_eq!(split.expression, "(20 + 5) * 4");
        assert_eq!(split.token.as_deref(), Some("dollars"));

        let split = extractor.split("10 + 5$").unwrap();
        assert_eq!(split.expression, "10 + 5");
        assert_eq!(split.token.as_deref(), Some("$"));
    }

    #[test]
    fn test_trailing_suffix_is_not_a_token() {
        let (_, extractor) = extractor();
        let split = extractor.split("2к + 3к").unwrap();
        assert_eq!(split.expression, "2к + 3к");
        assert_eq!(split.token, None);
    }

    #[test]
    fn test_leading_token() {
        let (_, extractor) = extractor();
        let split = extractor.split("€ 10 * 3").unwrap();
        assert_eq!(split.expression, "10 * 3");
        assert_eq!(split.token.as_deref(), Some("€"));

        let split = extractor.split("usd 7 - 2").unwrap();
        assert_eq!(split.expression, "7 - 2");
        assert_eq!(split.token.as_deref(), Some("usd"));
    }

    #[test]
    fn test_embedded_token_joins_halves() {
        let (_, extractor) = extractor();
        let split = extractor.split("5 * 2 eur + 1").unwrap();
        assert_eq!(split.expression, "5 * 2+ 1");
        assert_eq!(split.token.as_deref(), Some("eur"));

        // No boundary is put back: the digits on either side fuse
        let split = extractor.split("5 + 5 usd 1").unwrap();
        assert_eq!(split.expression, "5 + 51");
    }

    #[test]
    fn test_extract_examples() {
        let (catalog, extractor) = extractor();
        assert_eq!(
            extractor.extract(&catalog, "(20 + 5) * 4 dollars"),
            Some((dec!(100), "USD".to_string()))
        );
        assert_eq!(
            extractor.extract(&catalog, "1000 / 2 + 100 рублей"),
            Some((dec!(600), "RUB".to_string()))
        );
        assert_eq!(
            extractor.extract(&catalog, "3к + 2к бр"),
            Some((dec!(5000), "BYN".to_string()))
        );
    }

    #[test]
    fn test_unresolved_token_without_currency_elsewhere() {
        let (catalog, extractor) = extractor();
        assert_eq!(
            extractor.parse_and_evaluate("xyz 2 * 3"),
            Some((dec!(6), Some("xyz".to_string())))
        );
        assert_eq!(extractor.extract(&catalog, "xyz 2 * 3"), None);
    }

    #[test]
    fn test_text_scans() {
        let catalog = CurrencyCatalog::builtin();
        assert_eq!(find_alias(&catalog, "сколько будет 2 * 3 евро"), Some("EUR"));
        assert_eq!(find_alias(&catalog, "10 dollars"), Some("USD"));
        assert_eq!(find_alias(&catalog, "тонна"), None);
        assert_eq!(find_code(&catalog, "pay nzd now"), Some("NZD"));
        assert_eq!(find_code(&catalog, "nzdollar"), None);
    }

    #[test]
    fn test_value_without_currency_fails() {
        let (catalog, extractor) = extractor();
        assert_eq!(extractor.extract(&catalog, "2 + 2"), None);
        assert_eq!(extractor.extract(&catalog, "2к + 3к"), None);
    }

    #[test]
    fn test_malformed_expression_fails() {
        let (catalog, extractor) = extractor();
        assert_eq!(extractor.extract(&catalog, "5 / 0 usd"), None);
        assert_eq!(extractor.extract(&catalog, "2 ** 3 usd"), None);
        assert_eq!(extractor.extract(&catalog, "100 usd"), None);
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("10 долларов", "долларов", is_alias_letter));
        assert!(!contains_word("тонна", "тон", is_alias_letter));
        assert!(contains_word("(5)usd!", "usd", |c| c.is_ascii_alphabetic()));
    }
}
