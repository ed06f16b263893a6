//! Exchange rate models
//!
//! - `types` - Type alias for currency codes (Currency)
//! - `rate` - Rate values, tables and snapshots (RateValue, RateTable, RateSnapshot, RateSource)
//! - `selector` - Which provider(s) a request may use (SourceSelector)

mod rate;
mod selector;
mod types;

pub use rate::{RateSnapshot, RateSource, RateTable, RateValue};
pub use selector::SourceSelector;
pub use types::Currency;
