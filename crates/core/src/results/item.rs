use serde::{Deserialize, Serialize};

use crate::searcher::RawResult;
use crate::title::{classify, ParsedTitle};

use super::{Locator, LocatorError};

/// A raw search record with its classified title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    #[serde(flatten)]
    pub raw: RawResult,
    pub parsed: ParsedTitle,
}

impl Item {
    pub fn new(raw: RawResult) -> Self {
        let parsed = classify(&raw.title);
        Self { raw, parsed }
    }

    pub fn title(&self) -> &str {
        &self.raw.title
    }

    /// Dedup key: lower-cased, trimmed title.
    pub fn dedup_key(&self) -> String {
        self.raw.title.trim().to_lowercase()
    }

    /// Checked at add time, never at search time.
    pub fn locator(&self) -> Result<Locator, LocatorError> {
        Locator::parse(&self.raw.locator)
    }
}

/// Visible ordering of a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    SeedersDesc,
    NewestDesc,
}

impl SortMode {
    /// Short token used in button payloads.
    pub fn token(&self) -> &'static str {
        match self {
            SortMode::SeedersDesc => "seeders",
            SortMode::NewestDesc => "newest",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "seeders" => Some(SortMode::SeedersDesc),
            "newest" => Some(SortMode::NewestDesc),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::SeedersDesc => "Seeders",
            SortMode::NewestDesc => "Newest",
        }
    }
}
