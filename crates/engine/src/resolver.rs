//! Token → currency code resolution.

use crate::catalog::CurrencyCatalog;

/// Letters that can appear in an alias: ASCII lowercase and Cyrillic.
pub(crate) fn is_alias_letter(c: char) -> bool {
    c.is_ascii_lowercase() || ('а'..='я').contains(&c) || c == 'ё'
}

impl CurrencyCatalog {
    /// Map a raw token to a canonical code.
    ///
    /// Tried in order:
    /// 1. exact alias, case-insensitive, surrounding periods stripped
    /// 2. single-glyph symbol
    /// 3. the token itself as a known code
    /// 4. the token reduced to its letters, as an alias (`"руб."`, `"usd!"`)
    pub fn resolve(&self, token: &str) -> Option<&str> {
        let lowered = token.trim().to_lowercase();
        let token = lowered.trim_matches('.');
        if token.is_empty() {
            return None;
        }

        if let Some(code) = self.alias(token) {
            return Some(code);
        }

        let mut chars = token.chars();
        if let (Some(glyph), None) = (chars.next(), chars.next()) {
            if let Some(code) = self.symbol(glyph) {
                return Some(code);
            }
        }

        let upper = token.to_uppercase();
        if let Some(code) = self.code(&upper) {
            return Some(code);
        }

        let letters: String = token.chars().filter(|c| is_alias_letter(*c)).collect();
        if letters.is_empty() || letters == token {
            return None;
        }
        self.alias(&letters)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::CurrencyCatalog;

    #[test]
    fn test_resolve_aliases() {
        let catalog = CurrencyCatalog::builtin();
        assert_eq!(catalog.resolve("долларов"), Some("USD"));
        assert_eq!(catalog.resolve("Dollars"), Some("USD"));
        assert_eq!(catalog.resolve("бр."), Some("BYN"));
        assert_eq!(catalog.resolve(".евро."), Some("EUR"));
    }

    #[test]
    fn test_resolve_symbols() {
        let catalog = CurrencyCatalog::builtin();
        assert_eq!(catalog.resolve("€"), Some("EUR"));
        assert_eq!(catalog.resolve("Ξ"), Some("ETH"));
        assert_eq!(catalog.resolve("💎"), Some("TON"));
    }

    #[test]
    fn test_resolve_codes() {
        let catalog = CurrencyCatalog::builtin();
        assert_eq!(catalog.resolve("nzd"), Some("NZD"));
        assert_eq!(catalog.resolve("HUF"), Some("HUF"));
        assert_eq!(catalog.resolve("avax"), Some("AVAX"));
    }

    #[test]
    fn test_resolve_strips_non_letters() {
        let catalog = CurrencyCatalog::builtin();
        assert_eq!(catalog.resolve("руб.,"), Some("RUB"));
        assert_eq!(catalog.resolve("$usd"), Some("USD"));
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = CurrencyCatalog::builtin();
        assert_eq!(catalog.resolve(""), None);
        assert_eq!(catalog.resolve("..."), None);
        assert_eq!(catalog.resolve("xyz"), None);
        assert_eq!(catalog.resolve("много"), None);
    }
}
