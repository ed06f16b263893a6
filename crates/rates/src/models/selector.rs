use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Which providers a rate request may use.
///
/// `auto` walks every provider in priority order; any other value pins the
/// request to the provider with that id.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SourceSelector {
    #[default]
    Auto,
    Pinned(String),
}

impl SourceSelector {
    pub fn pinned(provider: impl Into<String>) -> Self {
        SourceSelector::Pinned(provider.into().to_lowercase())
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, SourceSelector::Auto)
    }
}

impl FromStr for SourceSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            Ok(SourceSelector::Auto)
        } else {
            Ok(SourceSelector::pinned(s))
        }
    }
}

impl fmt::Display for SourceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSelector::Auto => write!(f, "auto"),
            SourceSelector::Pinned(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auto() {
        assert_eq!("auto".parse::<SourceSelector>().unwrap(), SourceSelector::Auto);
        assert_eq!("AUTO".parse::<SourceSelector>().unwrap(), SourceSelector::Auto);
        assert_eq!("".parse::<SourceSelector>().unwrap(), SourceSelector::Auto);
    }

    #[test]
    fn test_parse_pinned_is_case_insensitive() {
        let selector: SourceSelector = "NBRB".parse().unwrap();
        assert_eq!(selector, SourceSelector::Pinned("nbrb".to_string()));
        assert_eq!(selector.to_string(), "nbrb");
        assert!(!selector.is_auto());
    }
}
