use rust_decimal::Decimal;

use super::tokens;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Word {
    /// 0..=19
    Units(u64),
    /// 20, 30 .. 90
    Tens(u64),
    /// Hundreds and scale words
    Multiplier(u64),
}

/// Every Russian number word understood by [`russian_words_to_number`].
pub const RUSSIAN_NUMBER_WORDS: &[&str] = &[
    "ноль", "один", "одна", "одну", "два", "две", "три", "четыре", "пять", "шесть", "семь",
    "восемь", "девять", "десять", "одиннадцать", "двенадцать", "тринадцать", "четырнадцать",
    "пятнадцать", "шестнадцать", "семнадцать", "восемнадцать", "девятнадцать", "двадцать",
    "тридцать", "сорок", "пятьдесят", "шестьдесят", "семьдесят", "восемьдесят", "девяносто",
    "сто", "двести", "триста", "четыреста", "пятьсот", "шестьсот", "семьсот", "восемьсот",
    "девятьсот", "тысяча", "тысячи", "тысяч", "тысячу", "миллион", "миллиона", "миллионов",
];

fn classify(word: &str) -> Option<Word> {
    let word = match word {
        "ноль" => Word::Units(0),
        "один" | "одна" | "одну" => Word::Units(1),
        "два" | "две" => Word::Units(2),
        "три" => Word::Units(3),
        "четыре" => Word::Units(4),
        "пять" => Word::Units(5),
        "шесть" => Word::Units(6),
        "семь" => Word::Units(7),
        "восемь" => Word::Units(8),
        "девять" => Word::Units(9),
        "десять" => Word::Units(10),
        "одиннадцать" => Word::Units(11),
        "двенадцать" => Word::Units(12),
        "тринадцать" => Word::Units(13),
        "четырнадцать" => Word::Units(14),
        "пятнадцать" => Word::Units(15),
        "шестнадцать" => Word::Units(16),
        "семнадцать" => Word::Units(17),
        "восемнадцать" => Word::Units(18),
        "девятнадцать" => Word::Units(19),
        "двадцать" => Word::Tens(20),
        "тридцать" => Word::Tens(30),
        "сорок" => Word::Tens(40),
        "пятьдесят" => Word::Tens(50),
        "шестьдесят" => Word::Tens(60),
        "семьдесят" => Word::Tens(70),
        "восемьдесят" => Word::Tens(80),
        "девяносто" => Word::Tens(90),
        "сто" => Word::Multiplier(100),
        "двести" => Word::Multiplier(200),
        "триста" => Word::Multiplier(300),
        "четыреста" => Word::Multiplier(400),
        "пятьсот" => Word::Multiplier(500),
        "шестьсот" => Word::Multiplier(600),
        "семьсот" => Word::Multiplier(700),
        "восемьсот" => Word::Multiplier(800),
        "девятьсот" => Word::Multiplier(900),
        "тысяча" | "тысячи" | "тысяч" | "тысячу" => Word::Multiplier(1_000),
        "миллион" | "миллиона" | "миллионов" => Word::Multiplier(1_000_000),
        _ => return None,
    };
    Some(word)
}

/// Russian spelled number, accumulated word by word.
///
/// `current` holds the pending tens and units. A multiplier word (сто ..
/// девятьсот, тысяча, миллион and their forms) adds `current * multiplier`
/// to the total, counting an empty `current` as one, and clears it. A tens
/// word seeds `current`, or shifts it left and adds when it is already set.
/// A units word is added after tens (`current >= 20`) and otherwise
/// replaces `current`. Unknown words are skipped. Returns `None` when the
/// total is zero.
pub fn russian_words_to_number(text: &str) -> Option<Decimal> {
    let mut result: u64 = 0;
    let mut current: u64 = 0;

    for token in tokens(text) {
        match classify(&token) {
            Some(Word::Multiplier(multiplier)) => {
                let factor = if current == 0 { 1 } else { current };
                result = result.checked_add(factor.checked_mul(multiplier)?)?;
                current = 0;
            }
            Some(Word::Tens(value)) => {
                current = if current == 0 {
                    value
                } else {
                    current.checked_mul(10)?.checked_add(value)?
                };
            }
            Some(Word::Units(value)) => {
                current = if current >= 20 {
                    current.checked_add(value)?
                } else {
                    value
                };
            }
            None => {}
        }
    }

    let total = result.checked_add(current)?;
    (total > 0).then(|| Decimal::from(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_units_and_tens() {
        assert_eq!(russian_words_to_number("пять"), Some(dec!(5)));
        assert_eq!(russian_words_to_number("двадцать пять"), Some(dec!(25)));
        assert_eq!(russian_words_to_number("девятнадцать"), Some(dec!(19)));
    }

    #[test]
    fn test_hundreds() {
        assert_eq!(russian_words_to_number("сто двадцать три"), Some(dec!(123)));
        assert_eq!(russian_words_to_number("триста"), Some(dec!(300)));
    }

    #[test]
    fn test_scales() {
        assert_eq!(russian_words_to_number("тысяча"), Some(dec!(1000)));
        assert_eq!(
            russian_words_to_number("две тысячи пятьсот"),
            Some(dec!(2500))
        );
        assert_eq!(
            russian_words_to_number("три миллиона сорок один"),
            Some(dec!(3000041))
        );
    }

    #[test]
    fn test_multiplier_flushes_only_pending_tens_and_units() {
        // A hundreds word is flushed before the scale word arrives, so the
        // scale applies to an empty accumulator
        assert_eq!(
            russian_words_to_number("сто двадцать тысяч"),
            Some(dec!(20100))
        );
        assert_eq!(russian_words_to_number("двести тысяч"), Some(dec!(1200)));
    }

    #[test]
    fn test_units_after_tens_are_added() {
        assert_eq!(russian_words_to_number("двадцать пять три"), Some(dec!(28)));
        assert_eq!(russian_words_to_number("пять три"), Some(dec!(3)));
        assert_eq!(russian_words_to_number("двадцать тридцать"), Some(dec!(230)));
    }

    #[test]
    fn test_unknown_words_skipped() {
        assert_eq!(
            russian_words_to_number("ну примерно сорок два рубля"),
            Some(dec!(42))
        );
    }

    #[test]
    fn test_zero_and_empty() {
        assert_eq!(russian_words_to_number("ноль"), None);
        assert_eq!(russian_words_to_number("рублей"), None);
        assert_eq!(russian_words_to_number(""), None);
    }
}
