//! Download locators.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a locator cannot be handed to the download client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("no download link")]
    Missing,

    #[error("unsupported download link: {0}")]
    Unsupported(String),
}

/// A usable magnet URI or direct download URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Magnet(String),
    Url(String),
}

impl Locator {
    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LocatorError::Missing);
        }

        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("magnet:") {
            Ok(Locator::Magnet(raw.to_string()))
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Locator::Url(raw.to_string()))
        } else {
            Err(LocatorError::Unsupported(raw.chars().take(40).collect()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Locator::Magnet(s) | Locator::Url(s) => s,
        }
    }

    pub fn is_magnet(&self) -> bool {
        matches!(self, Locator::Magnet(_))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_magnet() {
        let locator = Locator::parse("magnet:?xt=urn:btih:abc").unwrap();
        assert!(locator.is_magnet());
        assert_eq!(locator.as_str(), "magnet:?xt=urn:btih:abc");
    }

    #[test]
    fn test_parse_url() {
        let locator = Locator::parse(" https://tracker/dl/1.torrent ").unwrap();
        assert_eq!(locator, Locator::Url("https://tracker/dl/1.torrent".to_string()));
    }

    #[test]
    fn test_parse_missing_and_unsupported() {
        assert_eq!(Locator::parse(""), Err(LocatorError::Missing));
        assert_eq!(Locator::parse("   "), Err(LocatorError::Missing));
        assert!(matches!(
            Locator::parse("ftp://host/file"),
            Err(LocatorError::Unsupported(_))
        ));
    }
}
