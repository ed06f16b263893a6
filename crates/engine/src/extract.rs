//! Extraction orchestrator.
//!
//! Stages, first success wins:
//! 1. arithmetic expression
//! 2. direct pattern cascade over the normalized text
//! 3. spelled-out number plus an alias found anywhere (word fallback)
//! 4. number directly followed by a currency noun (word fallback)

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::debug;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cascade::{PatternCascade, NUMBER};
use crate::catalog::CurrencyCatalog;
use crate::errors::CatalogError;
use crate::math::MathExtractor;
use crate::normalize::{detect_multiplier, normalize_number, parse_number};
use crate::numerals::{words_to_number, ENGLISH_NUMBER_WORDS, RUSSIAN_NUMBER_WORDS};
use crate::resolver::is_alias_letter;

/// An amount of a known currency.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryToken {
    pub amount: Decimal,
    /// Canonical code, always present in the catalog
    pub currency_code: String,
}

impl MonetaryToken {
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }
}

/// How much effort extraction puts in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Only texts starting with a digit; no word fallback
    Simplified,
    /// Math and pattern stages only
    Standard,
    /// Every stage, including spelled-out numbers
    #[default]
    Advanced,
}

impl ProcessingMode {
    pub fn word_fallback(&self) -> bool {
        matches!(self, ProcessingMode::Advanced)
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingMode::Simplified => "simplified",
            ProcessingMode::Standard => "standard",
            ProcessingMode::Advanced => "advanced",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simplified" => Ok(ProcessingMode::Simplified),
            "standard" => Ok(ProcessingMode::Standard),
            "advanced" => Ok(ProcessingMode::Advanced),
            other => Err(format!("Unknown processing mode: {}", other)),
        }
    }
}

/// Money phrases: a quantity right next to a currency noun.
#[derive(Debug)]
struct PhrasePatterns {
    digits: Regex,
    words: Regex,
}

impl PhrasePatterns {
    fn new(catalog: &CurrencyCatalog) -> Result<Option<Self>, CatalogError> {
        // Multi-letter word aliases, longest first so alternation prefers them
        let nouns: Vec<String> = catalog
            .aliases_longest_first()
            .map(|(alias, _)| alias)
            .filter(|alias| alias.chars().count() > 1 && alias.chars().all(is_alias_letter))
            .map(regex::escape)
            .collect();
        if nouns.is_empty() {
            return Ok(None);
        }
        let nouns = nouns.join("|");

        let mut number_words: Vec<&str> = ENGLISH_NUMBER_WORDS
            .iter()
            .chain(RUSSIAN_NUMBER_WORDS.iter())
            .copied()
            .collect();
        number_words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        let number_words = number_words.join("|");

        Ok(Some(Self {
            digits: Regex::new(&format!(r"{NUMBER}\s*({nouns})"))?,
            words: Regex::new(&format!(r"\b((?:(?:{number_words})\s+)+)({nouns})"))?,
        }))
    }

    fn extract(&self, catalog: &CurrencyCatalog, text: &str) -> Option<(Decimal, String)> {
        for caps in self.digits.captures_iter(text) {
            let (Some(number), Some(noun)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if let (Some(amount), Some(code)) =
                (parse_number(number.as_str()), catalog.resolve(noun.as_str()))
            {
                return Some((amount, code.to_string()));
            }
        }

        for caps in self.words.captures_iter(text) {
            let (Some(words), Some(noun)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if let (Some(amount), Some(code)) = (
                words_to_number(words.as_str()),
                catalog.resolve(noun.as_str()),
            ) {
                return Some((amount, code.to_string()));
            }
        }
        None
    }
}

/// Finds the amount and currency in free text.
///
/// Built once per catalog; all patterns are compiled up front so
/// extraction itself never fails.
#[derive(Debug)]
pub struct Extractor {
    catalog: Arc<CurrencyCatalog>,
    math: MathExtractor,
    cascade: PatternCascade,
    phrases: Option<PhrasePatterns>,
}

impl Extractor {
    pub fn new(catalog: Arc<CurrencyCatalog>) -> Result<Self, CatalogError> {
        let math = MathExtractor::new(&catalog)?;
        let cascade = PatternCascade::new(&catalog)?;
        let phrases = PhrasePatterns::new(&catalog)?;
        Ok(Self {
            catalog,
            math,
            cascade,
            phrases,
        })
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn math(&self) -> &MathExtractor {
        &self.math
    }

    /// Run the stages in order. Stages 3 and 4 only run with `word_fallback`.
    pub fn extract(&self, text: &str, word_fallback: bool) -> Option<MonetaryToken> {
        let lowered = text.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }

        if let Some((amount, code)) = self.math.extract(&self.catalog, &lowered) {
            debug!("Extracted {} {} from math expression", amount, code);
            return Some(MonetaryToken::new(amount, code));
        }

        let scaled = detect_multiplier(&normalize_number(&lowered));
        if let Some((amount, code)) = self
            .cascade
            .extract(&self.catalog, &scaled.text, scaled.multiplier)
        {
            debug!("Extracted {} {} from pattern cascade", amount, code);
            return Some(MonetaryToken::new(amount, code));
        }

        if !word_fallback {
            return None;
        }

        if let Some((amount, code)) = self.words_with_alias(&lowered) {
            debug!("Extracted {} {} from number words", amount, code);
            return Some(MonetaryToken::new(amount, code));
        }

        let (amount, code) = self.phrases.as_ref()?.extract(&self.catalog, &lowered)?;
        debug!("Extracted {} {} from money phrase", amount, code);
        Some(MonetaryToken::new(amount, code))
    }

    /// Extraction under a processing mode.
    pub fn extract_with_mode(&self, text: &str, mode: ProcessingMode) -> Option<MonetaryToken> {
        if mode == ProcessingMode::Simplified
            && !text.trim_start().starts_with(|c: char| c.is_ascii_digit())
        {
            return None;
        }
        self.extract(text, mode.word_fallback())
    }

    fn words_with_alias(&self, lowered: &str) -> Option<(Decimal, String)> {
        let amount = words_to_number(lowered)?;
        let code = self
            .catalog
            .aliases_longest_first()
            .filter(|(alias, _)| alias.chars().count() > 1)
            .find(|(alias, _)| starts_word(lowered, alias))
            .map(|(_, code)| code)?;
        Some((amount, code.to_string()))
    }
}

/// Whether `needle` occurs in `haystack` at the start of a word.
fn starts_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        !haystack[..start]
            .chars()
            .next_back()
            .is_some_and(is_alias_letter)
    })
}
