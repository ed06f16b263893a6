//! Rendering amounts and conversion reports.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::CurrencyCatalog;
use crate::convert::Conversions;
use crate::extract::MonetaryToken;

/// Currencies shown without minor units.
const WHOLE_UNIT_CURRENCIES: &[&str] = &["JPY", "KRW"];

/// Display preferences for rendered amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Appearance {
    pub show_flags: bool,
    pub show_codes: bool,
    pub show_symbols: bool,
    /// Crypto amounts always with 2 decimals
    pub compact: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            show_flags: true,
            show_codes: true,
            show_symbols: true,
            compact: false,
        }
    }
}

/// `value` with exactly `dp` decimals, half away from zero.
fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// `value` with `dp` decimals and comma thousands separators.
fn grouped(value: Decimal, dp: u32) -> String {
    let text = fixed(value, dp);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Render one amount, e.g. `🇺🇸1,234.50$ USD` or `0.00012345 BTC`.
pub fn format_amount(
    catalog: &CurrencyCatalog,
    amount: Decimal,
    currency: &str,
    appearance: &Appearance,
) -> String {
    let code = if appearance.show_codes {
        format!(" {}", currency)
    } else {
        String::new()
    };

    if catalog.is_fiat(currency) {
        let flag = if appearance.show_flags {
            catalog.flag(currency).unwrap_or_default()
        } else {
            ""
        };
        let symbol = if appearance.show_symbols {
            catalog.display_symbol(currency).unwrap_or_default()
        } else {
            ""
        };
        let dp = if WHOLE_UNIT_CURRENCIES.contains(&currency) { 0 } else { 2 };
        return format!("{}{}{}{}", flag, grouped(amount, dp), symbol, code)
            .trim()
            .to_string();
    }

    let dp = if appearance.compact {
        2
    } else if amount < Decimal::new(1, 2) {
        8
    } else if amount < Decimal::ONE {
        4
    } else {
        2
    };
    format!("{}{}", fixed(amount, dp), code).trim().to_string()
}

/// Render an arithmetic result, e.g. `$100` or `2.5 BYN`.
///
/// The value keeps at most two decimals and drops trailing zeros. `token`
/// may be a glyph or a code; a glyph, or a code that has one, is put in
/// front of the number.
pub fn format_math_result(
    catalog: &CurrencyCatalog,
    value: Decimal,
    token: Option<&str>,
) -> String {
    let number = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .normalize()
        .to_string();

    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return number;
    };

    let mut chars = token.chars();
    if let (Some(glyph), None) = (chars.next(), chars.next()) {
        if catalog.symbol(glyph).is_some() {
            return format!("{}{}", glyph, number);
        }
    }
    match catalog.glyph_for(&token.to_uppercase()) {
        Some(glyph) => format!("{}{}", glyph, number),
        None => format!("{} {}", number, token),
    }
}

/// Render a conversion report.
///
/// ```text
/// 🇺🇸100 USD
///
/// 🇪🇺92.00€ EUR
/// 🇷🇺9,000.00₽ RUB
///
/// 0.00222222 BTC
/// ```
///
/// With `debug`, each line carries the table that priced it.
pub fn render_report(
    catalog: &CurrencyCatalog,
    origin: &MonetaryToken,
    conversions: &Conversions,
    appearance: &Appearance,
    debug: bool,
) -> String {
    let flag = if appearance.show_flags {
        catalog.flag(&origin.currency_code).unwrap_or_default()
    } else {
        ""
    };
    let code = if appearance.show_codes {
        format!(" {}", origin.currency_code)
    } else {
        String::new()
    };
    let mut report = format!("{}{}{}\n\n", flag, origin.amount.normalize(), code);

    let mut fiat = Vec::new();
    let mut crypto = Vec::new();
    for line in conversions.iter() {
        let mut text = format_amount(catalog, line.amount, &line.currency, appearance);
        if debug {
            text.push_str(&format!("  (src: {})", line.source));
        }
        if catalog.is_fiat(&line.currency) {
            fiat.push(text);
        } else {
            crypto.push(text);
        }
    }

    let blocks: Vec<String> = [fiat, crypto]
        .into_iter()
        .filter(|lines| !lines.is_empty())
        .map(|lines| lines.join("\n"))
        .collect();
    report.push_str(&blocks.join("\n\n"));
    report
}
