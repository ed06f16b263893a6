//! Moneywords extraction and conversion engine
//!
//! Finds an amount of money in free text (English or Russian, codes,
//! aliases, symbols, arithmetic, `k`/`к` suffixes, spelled-out numbers) and
//! converts it into other currencies using the rates crate.
//!
//! # Extraction
//!
//! ```text
//! text ──► math expression ──► pattern cascade ──► number words ──► money phrases
//!              (stage 1)           (stage 2)         (stage 3)        (stage 4)
//! ```
//!
//! The first stage that yields an amount with a known currency wins.
//! Stages 3 and 4 run only in [`ProcessingMode::Advanced`].
//!
//! # Example
//!
//! ```
//! use moneywords_engine::{CurrencyCatalog, Extractor};
//! use rust_decimal::Decimal;
//!
//! let extractor = Extractor::new(CurrencyCatalog::builtin()).unwrap();
//! let token = extractor.extract("(20 + 5) * 4 dollars", true).unwrap();
//! assert_eq!(token.amount, Decimal::from(100));
//! assert_eq!(token.currency_code, "USD");
//! ```

pub mod cascade;
pub mod catalog;
pub mod convert;
pub mod errors;
pub mod extract;
pub mod format;
pub mod math;
pub mod normalize;
pub mod numerals;
mod resolver;
mod service;

pub use catalog::{CurrencyCatalog, CurrencyKind, DisplayInfo};
pub use convert::{ConversionEngine, ConvertedAmount, Conversions, SourceTag};
pub use errors::CatalogError;
pub use extract::{Extractor, MonetaryToken, ProcessingMode};
pub use format::{format_amount, format_math_result, render_report, Appearance};
pub use numerals::words_to_number;
pub use service::{CurrencyService, ReportOptions};
