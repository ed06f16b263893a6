//! Spelled-out numbers.
//!
//! English is tried first; Russian runs only when English finds nothing.
//! Both return `None` for a zero total, so "zero" and "no number" are
//! indistinguishable.

mod english;
mod russian;

pub use english::{english_words_to_number, ENGLISH_NUMBER_WORDS};
pub use russian::{russian_words_to_number, RUSSIAN_NUMBER_WORDS};

use rust_decimal::Decimal;

/// Split text into lowercase word tokens, treating punctuation as spaces.
pub(crate) fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Convert a spelled-out number (English or Russian) to its value.
pub fn words_to_number(text: &str) -> Option<Decimal> {
    english_words_to_number(text).or_else(|| russian_words_to_number(text))
}
