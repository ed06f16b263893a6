//! Currency catalog: codes, aliases, symbols and display metadata.
//!
//! The built-in catalog is compiled in from `currencies.json` via
//! `include_str!` and validated once via `lazy_static`. A replacement with
//! the same shape can be loaded from disk with [`CurrencyCatalog::from_path`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, info};
use serde::Deserialize;

use crate::errors::CatalogError;

// ── JSON schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CatalogFile {
    fiat: BTreeMap<String, String>,
    crypto: BTreeMap<String, String>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    symbols: HashMap<String, String>,
    #[serde(default)]
    display: HashMap<String, DisplayInfo>,
}

/// How a currency is decorated when rendered.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DisplayInfo {
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Whether a code is fiat or crypto.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

// ── Catalog with pre-built indexes ───────────────────────────────────────────

/// Immutable currency tables.
///
/// Invariants, checked at load:
/// - fiat and crypto codes are disjoint
/// - every alias and symbol resolves to exactly one of them
/// - every symbol is a single character
#[derive(Debug)]
pub struct CurrencyCatalog {
    fiat: BTreeMap<String, String>,
    crypto: BTreeMap<String, String>,
    /// lowercase alias → code
    aliases: HashMap<String, String>,
    /// (alias, code) sorted by alias length, longest first
    aliases_by_length: Vec<(String, String)>,
    /// glyph → code
    symbols: BTreeMap<char, String>,
    /// code → preferred glyph
    glyph_by_code: HashMap<String, char>,
    display: HashMap<String, DisplayInfo>,
}

lazy_static! {
    static ref BUILTIN: Arc<CurrencyCatalog> = Arc::new(
        CurrencyCatalog::from_json(include_str!("currencies.json"))
            .expect("currencies.json must be valid")
    );
}

impl CurrencyCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Arc<CurrencyCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::build(file)
    }

    /// Read, parse and validate a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded currency catalog from {} ({} fiat, {} crypto, {} aliases)",
            path.display(),
            catalog.fiat.len(),
            catalog.crypto.len(),
            catalog.aliases.len()
        );
        Ok(catalog)
    }

    fn build(file: CatalogFile) -> Result<Self, CatalogError> {
        let upper = |map: BTreeMap<String, String>| -> BTreeMap<String, String> {
            map.into_iter()
                .map(|(code, name)| (code.trim().to_uppercase(), name))
                .collect()
        };
        let fiat = upper(file.fiat);
        let crypto = upper(file.crypto);

        if let Some(code) = fiat.keys().find(|code| crypto.contains_key(*code)) {
            return Err(CatalogError::Overlap(code.clone()));
        }
        let known = |code: &str| fiat.contains_key(code) || crypto.contains_key(code);

        let mut aliases = HashMap::with_capacity(file.aliases.len());
        for (alias, code) in file.aliases {
            let code = code.trim().to_uppercase();
            if !known(&code) {
                return Err(CatalogError::UnknownAliasTarget { alias, code });
            }
            let alias = alias.trim().to_lowercase();
            if !alias.is_empty() {
                aliases.insert(alias, code);
            }
        }

        let mut symbols = BTreeMap::new();
        for (symbol, code) in file.symbols {
            let code = code.trim().to_uppercase();
            if !known(&code) {
                return Err(CatalogError::UnknownSymbolTarget { symbol, code });
            }
            let mut chars = symbol.chars();
            match (chars.next(), chars.next()) {
                (Some(glyph), None) => {
                    symbols.insert(glyph, code);
                }
                _ => return Err(CatalogError::InvalidSymbol(symbol)),
            }
        }

        let mut glyph_by_code = HashMap::new();
        for (glyph, code) in &symbols {
            glyph_by_code.entry(code.clone()).or_insert(*glyph);
        }

        let mut aliases_by_length: Vec<(String, String)> = aliases
            .iter()
            .map(|(alias, code)| (alias.clone(), code.clone()))
            .collect();
        aliases_by_length.sort_by(|(a, _), (b, _)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let display = file
            .display
            .into_iter()
            .map(|(code, info)| (code.trim().to_uppercase(), info))
            .collect();

        debug!(
            "Currency catalog: {} fiat, {} crypto, {} aliases, {} symbols",
            fiat.len(),
            crypto.len(),
            aliases.len(),
            symbols.len()
        );

        Ok(Self {
            fiat,
            crypto,
            aliases,
            aliases_by_length,
            symbols,
            glyph_by_code,
            display,
        })
    }

    pub fn is_fiat(&self, code: &str) -> bool {
        self.fiat.contains_key(code)
    }

    pub fn is_crypto(&self, code: &str) -> bool {
        self.crypto.contains_key(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.is_fiat(code) || self.is_crypto(code)
    }

    pub fn kind(&self, code: &str) -> Option<CurrencyKind> {
        if self.is_fiat(code) {
            Some(CurrencyKind::Fiat)
        } else if self.is_crypto(code) {
            Some(CurrencyKind::Crypto)
        } else {
            None
        }
    }

    /// The canonical spelling of a known code.
    pub fn code(&self, code: &str) -> Option<&str> {
        self.fiat
            .get_key_value(code)
            .or_else(|| self.crypto.get_key_value(code))
            .map(|(code, _)| code.as_str())
    }

    /// Display name of a code.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.fiat
            .get(code)
            .or_else(|| self.crypto.get(code))
            .map(String::as_str)
    }

    /// Fiat codes in alphabetical order.
    pub fn fiat_codes(&self) -> impl Iterator<Item = &str> {
        self.fiat.keys().map(String::as_str)
    }

    /// Crypto codes in alphabetical order.
    pub fn crypto_codes(&self) -> impl Iterator<Item = &str> {
        self.crypto.keys().map(String::as_str)
    }

    /// Exact lookup of a lowercase alias.
    pub fn alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Aliases longest first, ties broken alphabetically.
    pub fn aliases_longest_first(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases_by_length
            .iter()
            .map(|(alias, code)| (alias.as_str(), code.as_str()))
    }

    pub fn symbol(&self, glyph: char) -> Option<&str> {
        self.symbols.get(&glyph).map(String::as_str)
    }

    /// Regex alternation matching any glyph, or `None` without symbols.
    pub(crate) fn symbol_pattern(&self) -> Option<String> {
        if self.symbols.is_empty() {
            return None;
        }
        let glyphs: Vec<String> = self
            .symbols
            .keys()
            .map(|glyph| regex::escape(&glyph.to_string()))
            .collect();
        Some(format!("(?:{})", glyphs.join("|")))
    }

    /// The input glyph for a code, if it has one (`$` for USD).
    pub fn glyph_for(&self, code: &str) -> Option<char> {
        self.glyph_by_code.get(code).copied()
    }

    pub fn flag(&self, code: &str) -> Option<&str> {
        self.display.get(code)?.flag.as_deref()
    }

    /// Symbol used when rendering amounts (`Br` for BYN).
    pub fn display_symbol(&self, code: &str) -> Option<&str> {
        self.display.get(code)?.symbol.as_deref()
    }
}
