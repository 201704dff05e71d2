//! Types produced by the title classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// Video quality detected in a release title.
///
/// Variants are declared best-first, so the derived ordering sorts
/// `FourK < P1080 < P720 < P480 < Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "4K")]
    FourK,
    #[serde(rename = "1080P")]
    P1080,
    #[serde(rename = "720P")]
    P720,
    #[serde(rename = "480P")]
    P480,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::FourK,
        Quality::P1080,
        Quality::P720,
        Quality::P480,
        Quality::Unknown,
    ];

    /// Stable token used in callback payloads and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::FourK => "4K",
            Quality::P1080 => "1080P",
            Quality::P720 => "720P",
            Quality::P480 => "480P",
            Quality::Unknown => "UNKNOWN",
        }
    }

    /// Short label for chat rows.
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Unknown => "?",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// One entry of an item's episode list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpisodeTag {
    Number(u32),
    Pack,
}

impl Serialize for EpisodeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EpisodeTag::Number(n) => serializer.serialize_u32(*n),
            EpisodeTag::Pack => serializer.serialize_str("PACK"),
        }
    }
}

/// Structured description of a free-text release title.
///
/// Invariants:
/// - `is_series == false` implies no season, no episode, no tags and `is_pack == false`.
/// - `is_pack == true` implies `episode_tags == [EpisodeTag::Pack]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTitle {
    pub quality: Quality,
    pub is_series: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub episode_tags: Vec<EpisodeTag>,
    pub is_pack: bool,
}

impl ParsedTitle {
    pub fn movie(quality: Quality) -> Self {
        Self {
            quality,
            is_series: false,
            season: None,
            episode: None,
            episode_tags: Vec::new(),
            is_pack: false,
        }
    }
}
