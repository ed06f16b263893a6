//! Exchange rate provider trait definition.

use async_trait::async_trait;

use crate::errors::RatesError;
use crate::models::RateTable;

/// Trait for exchange rate providers.
///
/// Implement this trait to add a new rate source. The registry orders
/// providers by [`priority`](Self::priority) and tracks failures per
/// [`id`](Self::id).
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use moneywords_rates::{RateProvider, RateTable, RatesError};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl RateProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "fixed"
///     }
///
///     async fn fetch_rates(&self, base: &str) -> Result<RateTable, RatesError> {
///         // ... build a table relative to `base`
///     }
/// }
/// ```
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique, lowercase identifier for this provider.
    ///
    /// Doubles as the pinned source selector value and as the provenance
    /// tag on snapshots it produces.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = tried first in `auto` mode. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Whether the provider has the credentials it needs.
    ///
    /// Unconfigured providers are skipped in `auto` mode without counting a
    /// failure against them.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch the full rate table relative to `base`.
    ///
    /// `base` is an uppercase currency code. The returned table maps codes to
    /// units of that currency per one unit of `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RatesError>;
}
