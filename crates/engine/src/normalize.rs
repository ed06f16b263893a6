//! Lexical normalization of numerals and magnitude suffixes.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

lazy_static! {
    /// Decimal comma between digits
    static ref DECIMAL_COMMA: Regex =
        Regex::new(r"([0-9]),([0-9])").expect("Invalid regex pattern");

    /// Whitespace inside a digit group ("1 000")
    static ref DIGIT_GROUPS: Regex =
        Regex::new(r"([0-9])\s+([0-9])").expect("Invalid regex pattern");

    static ref MILLION_SUFFIX: Regex =
        Regex::new(r"([0-9])\s*[kк]{2}").expect("Invalid regex pattern");

    static ref THOUSAND_SUFFIX: Regex =
        Regex::new(r"([0-9])\s*[kк]").expect("Invalid regex pattern");
}

/// Turn a decimal comma flanked by digits into a dot and join digit groups
/// separated by whitespace (`"1 000,5"` → `"1000.5"`).
///
/// Applied until nothing changes, so normalizing twice is a no-op.
pub fn normalize_number(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = DECIMAL_COMMA.replace_all(&current, "$1.$2");
        let next = DIGIT_GROUPS.replace_all(&next, "$1$2").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Text with its magnitude suffix removed, plus the multiplier it implied.
#[derive(Clone, Debug, PartialEq)]
pub struct Scaled {
    pub text: String,
    pub multiplier: Decimal,
}

fn is_word_letter(c: char) -> bool {
    c.is_ascii_lowercase() || ('а'..='я').contains(&c) || c == 'ё'
}

/// Detect `k`/`к` (thousand) and `kk`/`кк` (million) right after a digit.
///
/// A single `k` followed by a letter is left alone so `5kzt` keeps its
/// currency code. Expects lowercase input.
pub fn detect_multiplier(text: &str) -> Scaled {
    if MILLION_SUFFIX.is_match(text) {
        return Scaled {
            text: MILLION_SUFFIX.replace_all(text, "$1").into_owned(),
            multiplier: Decimal::from(1_000_000),
        };
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut found = false;
    for caps in THOUSAND_SUFFIX.captures_iter(text) {
        let (Some(whole), Some(digit)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let followed_by_letter = text[whole.end()..]
            .chars()
            .next()
            .is_some_and(is_word_letter);
        if followed_by_letter {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(digit.as_str());
        last = whole.end();
        found = true;
    }

    if !found {
        return Scaled {
            text: text.to_string(),
            multiplier: Decimal::ONE,
        };
    }

    out.push_str(&text[last..]);
    Scaled {
        text: out,
        multiplier: Decimal::from(1_000),
    }
}

/// Parse a numeral captured by one of the extraction patterns.
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let normalized = normalize_number(raw.trim()).replace(',', ".");
    Decimal::from_str(&normalized).ok()
}
