//! Construction-time errors.
//!
//! Text extraction and conversion never fail; unresolvable input yields
//! `None` or an empty result. Only loading and validating a currency catalog
//! can go wrong, and that is reported here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog document is not valid JSON or has the wrong shape.
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A code is listed as both fiat and crypto.
    #[error("Currency {0} is listed as both fiat and crypto")]
    Overlap(String),

    /// An alias points at a code that is neither fiat nor crypto.
    #[error("Alias '{alias}' points at unknown currency {code}")]
    UnknownAliasTarget { alias: String, code: String },

    /// A symbol points at a code that is neither fiat nor crypto.
    #[error("Symbol '{symbol}' points at unknown currency {code}")]
    UnknownSymbolTarget { symbol: String, code: String },

    /// A symbol key is not exactly one character.
    #[error("Symbol '{0}' must be a single character")]
    InvalidSymbol(String),

    /// A pattern built from catalog data failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
