//! Resolution token detection.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::Quality;

static QUALITY_TOKEN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(4K|2160p|1080p|720p|480p|540p)").ok());

/// Detect the quality of a title from its first resolution token.
///
/// `2160p` is normalized to 4K and `540p` falls in the 480P (SD) bucket.
/// Titles without a token are `Unknown`.
pub fn detect_quality(title: &str) -> Quality {
    let Some(re) = QUALITY_TOKEN.as_ref() else {
        return Quality::Unknown;
    };

    match re
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
        .as_deref()
    {
        Some("4K") | Some("2160P") => Quality::FourK,
        Some("1080P") => Quality::P1080,
        Some("720P") => Quality::P720,
        Some("480P") | Some("540P") => Quality::P480,
        _ => Quality::Unknown,
    }
}
