use rust_decimal::Decimal;

use super::tokens;

/// Every English number word understood by [`english_words_to_number`].
pub const ENGLISH_NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand", "million", "billion",
];

fn small_value(word: &str) -> Option<u64> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

fn scale_value(word: &str) -> Option<u64> {
    match word {
        "thousand" => Some(1_000),
        "million" => Some(1_000_000),
        "billion" => Some(1_000_000_000),
        _ => None,
    }
}

/// English spelled number. Non-number words are ignored.
///
/// Returns `None` when no number word is present or the total is zero.
pub fn english_words_to_number(text: &str) -> Option<Decimal> {
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut seen = false;

    for word in tokens(text) {
        if let Some(value) = small_value(&word) {
            current = current.checked_add(value)?;
            seen = true;
        } else if word == "hundred" {
            current = current.max(1).checked_mul(100)?;
            seen = true;
        } else if let Some(scale) = scale_value(&word) {
            total = total.checked_add(current.max(1).checked_mul(scale)?)?;
            current = 0;
            seen = true;
        }
    }

    if !seen {
        return None;
    }
    let value = total.checked_add(current)?;
    (value > 0).then(|| Decimal::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_simple_numbers() {
        assert_eq!(english_words_to_number("seven"), Some(dec!(7)));
        assert_eq!(english_words_to_number("twenty five"), Some(dec!(25)));
        assert_eq!(english_words_to_number("twenty-five"), Some(dec!(25)));
    }

    #[test]
    fn test_hundreds_and_scales() {
        assert_eq!(
            english_words_to_number("three hundred and forty two"),
            Some(dec!(342))
        );
        assert_eq!(
            english_words_to_number("two million five hundred thousand"),
            Some(dec!(2500000))
        );
        assert_eq!(english_words_to_number("thousand"), Some(dec!(1000)));
    }

    #[test]
    fn test_other_words_ignored() {
        assert_eq!(
            english_words_to_number("I owe you fifty bucks"),
            Some(dec!(50))
        );
    }

    #[test]
    fn test_no_number_words() {
        assert_eq!(english_words_to_number("двадцать долларов"), None);
        assert_eq!(english_words_to_number("zero"), None);
    }
}
