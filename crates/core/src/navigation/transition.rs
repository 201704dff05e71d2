//! Button payloads.
//!
//! Every payload is a short fixed prefix plus ids so it fits in a chat
//! callback (64 bytes on Telegram).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::results::SortMode;
use crate::title::Quality;

/// A navigation event carried by a button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Season(u32),
    Quality(Quality),
    BackSeasons,
    BackQuality,
    AllRaw,
    Page(usize),
    EpisodePage(usize),
    Sort(SortMode),
    Indexer(String),
    IndexerAll,
    Back,
    /// Add an item of the result set at `revision` to the download client.
    Download { revision: u64, index: usize },
}

impl Transition {
    /// Parse a payload. Unknown payloads give `None`.
    pub fn parse(payload: &str) -> Option<Self> {
        // Exact payloads first: some share a prefix with the parameterised ones.
        match payload {
            "back_seasons" => return Some(Transition::BackSeasons),
            "back_quality" => return Some(Transition::BackQuality),
            "all_raw" => return Some(Transition::AllRaw),
            "indexer_all" => return Some(Transition::IndexerAll),
            "back" => return Some(Transition::Back),
            _ => {}
        }

        if let Some(rest) = payload.strip_prefix("season_") {
            return rest.parse().ok().map(Transition::Season);
        }
        if let Some(rest) = payload.strip_prefix("quality_") {
            return rest.parse().ok().map(Transition::Quality);
        }
        if let Some(rest) = payload.strip_prefix("episode_page_") {
            return rest.parse().ok().map(Transition::EpisodePage);
        }
        if let Some(rest) = payload.strip_prefix("page_") {
            return rest.parse().ok().map(Transition::Page);
        }
        if let Some(rest) = payload.strip_prefix("sort_") {
            return SortMode::from_token(rest).map(Transition::Sort);
        }
        if let Some(rest) = payload.strip_prefix("indexer_") {
            return (!rest.is_empty()).then(|| Transition::Indexer(rest.to_string()));
        }
        if let Some(rest) = payload.strip_prefix("t_") {
            let (revision, index) = rest.split_once('_')?;
            return Some(Transition::Download {
                revision: revision.parse().ok()?,
                index: index.parse().ok()?,
            });
        }

        None
    }

    /// Encode back into a payload.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Season(s) => write!(f, "season_{}", s),
            Transition::Quality(q) => write!(f, "quality_{}", q.as_str()),
            Transition::BackSeasons => f.write_str("back_seasons"),
            Transition::BackQuality => f.write_str("back_quality"),
            Transition::AllRaw => f.write_str("all_raw"),
            Transition::Page(n) => write!(f, "page_{}", n),
            Transition::EpisodePage(n) => write!(f, "episode_page_{}", n),
            Transition::Sort(mode) => write!(f, "sort_{}", mode.token()),
            Transition::Indexer(id) => write!(f, "indexer_{}", id),
            Transition::IndexerAll => f.write_str("indexer_all"),
            Transition::Back => f.write_str("back"),
            Transition::Download { revision, index } => write!(f, "t_{}_{}", revision, index),
        }
    }
}

impl Serialize for Transition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_payloads() {
        assert_eq!(Transition::parse("back"), Some(Transition::Back));
        assert_eq!(
            Transition::parse("back_seasons"),
            Some(Transition::BackSeasons)
        );
        assert_eq!(
            Transition::parse("back_quality"),
            Some(Transition::BackQuality)
        );
        assert_eq!(Transition::parse("all_raw"), Some(Transition::AllRaw));
        assert_eq!(Transition::parse("indexer_all"), Some(Transition::IndexerAll));
    }

    #[test]
    fn test_parse_parameterised_payloads() {
        assert_eq!(Transition::parse("season_3"), Some(Transition::Season(3)));
        assert_eq!(
            Transition::parse("quality_1080P"),
            Some(Transition::Quality(Quality::P1080))
        );
        assert_eq!(
            Transition::parse("quality_UNKNOWN"),
            Some(Transition::Quality(Quality::Unknown))
        );
        assert_eq!(Transition::parse("page_4"), Some(Transition::Page(4)));
        assert_eq!(
            Transition::parse("episode_page_2"),
            Some(Transition::EpisodePage(2))
        );
        assert_eq!(
            Transition::parse("sort_newest"),
            Some(Transition::Sort(SortMode::NewestDesc))
        );
        assert_eq!(
            Transition::parse("indexer_eztv"),
            Some(Transition::Indexer("eztv".to_string()))
        );
        assert_eq!(
            Transition::parse("t_17_4"),
            Some(Transition::Download {
                revision: 17,
                index: 4
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for payload in [
            "",
            "season_x",
            "quality_8K",
            "page_-1",
            "sort_size",
            "indexer_",
            "t_1",
            "t_a_b",
            "menu",
        ] {
            assert_eq!(Transition::parse(payload), None, "{payload}");
        }
    }

    #[test]
    fn test_encode_parses_back() {
        let transitions = [
            Transition::Season(12),
            Transition::Quality(Quality::FourK),
            Transition::EpisodePage(1),
            Transition::Sort(SortMode::SeedersDesc),
            Transition::Indexer("1337x".to_string()),
            Transition::Download {
                revision: 9,
                index: 29,
            },
        ];
        for t in transitions {
            assert_eq!(Transition::parse(&t.encode()), Some(t));
        }
    }

    #[test]
    fn test_serializes_as_payload() {
        let transitions = vec![
            Transition::Season(2),
            Transition::Download {
                revision: 7,
                index: 3,
            },
        ];
        let json = serde_json::to_string(&transitions).unwrap();
        assert_eq!(json, r#"["season_2","t_7_3"]"#);
    }
}
