//! Ordered (number, currency token) patterns.
//!
//! Each rule is tried in turn over the normalized text. A rule whose token
//! does not resolve moves on to its next match, then to the next rule.

use log::trace;
use regex::Regex;
use rust_decimal::Decimal;

use crate::catalog::CurrencyCatalog;
use crate::errors::CatalogError;
use crate::normalize::parse_number;

/// A decimal numeral with an optional fractional part.
pub(crate) const NUMBER: &str = r"([0-9]+(?:[.,][0-9]+)?)";

#[derive(Clone, Copy, Debug)]
enum Layout {
    /// Group 1 is the number, group 2 the currency token
    NumberFirst,
    /// Group 1 is the currency token, group 2 the number
    TokenFirst,
}

#[derive(Debug)]
struct Rule {
    name: &'static str,
    regex: Regex,
    layout: Layout,
}

/// The direct extraction cascade.
#[derive(Debug)]
pub struct PatternCascade {
    rules: Vec<Rule>,
}

impl PatternCascade {
    pub fn new(catalog: &CurrencyCatalog) -> Result<Self, CatalogError> {
        let mut specs: Vec<(&'static str, String, Layout)> = vec![
            // "15usd", "1бр.", "100eur"
            (
                "concatenated",
                format!(r"{NUMBER}([a-z]+|[а-яё.]+)"),
                Layout::NumberFirst,
            ),
            // "5 долларов", "10.5 евро"
            (
                "number-word",
                format!(r"{NUMBER}\s+([а-яё]+)"),
                Layout::NumberFirst,
            ),
        ];

        if let Some(symbols) = catalog.symbol_pattern() {
            // "$5", "€ 10.5"
            specs.push((
                "symbol-number",
                format!(r"({symbols})\s*{NUMBER}"),
                Layout::TokenFirst,
            ));
            // "5$", "10.5 €"
            specs.push((
                "number-symbol",
                format!(r"{NUMBER}\s*({symbols})"),
                Layout::NumberFirst,
            ));
        }

        // "usd 5", "5 usd"
        specs.push((
            "code-number",
            format!(r"([a-z]+)\s+{NUMBER}"),
            Layout::TokenFirst,
        ));
        specs.push((
            "number-code",
            format!(r"{NUMBER}\s+([a-z]+)"),
            Layout::NumberFirst,
        ));

        let rules = specs
            .into_iter()
            .map(|(name, pattern, layout)| {
                Ok(Rule {
                    name,
                    regex: Regex::new(&pattern)?,
                    layout,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(Self { rules })
    }

    /// First (amount, code) any rule yields, scaled by `multiplier`.
    ///
    /// `text` must already be lowercased, number-normalized and stripped of
    /// its magnitude suffix.
    pub fn extract(
        &self,
        catalog: &CurrencyCatalog,
        text: &str,
        multiplier: Decimal,
    ) -> Option<(Decimal, String)> {
        for rule in &self.rules {
            for caps in rule.regex.captures_iter(text) {
                let (number, token) = match rule.layout {
                    Layout::NumberFirst => (caps.get(1), caps.get(2)),
                    Layout::TokenFirst => (caps.get(2), caps.get(1)),
                };
                let (Some(number), Some(token)) = (number, token) else {
                    continue;
                };

                let Some(code) = catalog.resolve(token.as_str()) else {
                    trace!(
                        "Rule '{}': token '{}' did not resolve",
                        rule.name,
                        token.as_str()
                    );
                    continue;
                };
                let Some(amount) =
                    parse_number(number.as_str()).and_then(|n| n.checked_mul(multiplier))
                else {
                    continue;
                };

                trace!("Rule '{}' matched {} {}", rule.name, amount, code);
                return Some((amount, code.to_string()));
            }
        }
        None
    }
}
