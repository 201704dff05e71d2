//! Ordered season/episode matching rules.
//!
//! Each rule is a pure function from a title to an optional [`SeriesMatch`].
//! Rules are tried in declaration order and the first match wins.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

/// Season/episode fragment produced by a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesMatch {
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// The title names a whole season rather than one episode.
    pub pack: bool,
}

impl SeriesMatch {
    fn episode(season: Option<u32>, episode: u32) -> Self {
        Self {
            season,
            episode: Some(episode),
            pack: false,
        }
    }

    fn season_pack(season: u32) -> Self {
        Self {
            season: Some(season),
            episode: None,
            pack: true,
        }
    }
}

/// A named matching rule.
pub struct SeriesRule {
    pub name: &'static str,
    pub matcher: fn(&str) -> Option<SeriesMatch>,
}

/// Rules in precedence order.
///
/// The relative order of `anime_absolute` and `season_phrase` is kept as-is
/// even though a title can match both; nothing in the data says which one
/// should win.
pub static SERIES_RULES: &[SeriesRule] = &[
    SeriesRule {
        name: "season_episode",
        matcher: match_season_episode,
    },
    SeriesRule {
        name: "season_episode_separated",
        matcher: match_season_episode_separated,
    },
    SeriesRule {
        name: "anime_absolute",
        matcher: match_anime_absolute,
    },
    SeriesRule {
        name: "season_phrase",
        matcher: match_season_phrase,
    },
    SeriesRule {
        name: "bare_season",
        matcher: match_bare_season,
    },
];

/// Run the rules in order and return the first match with its rule name.
pub fn first_match(title: &str) -> Option<(&'static str, SeriesMatch)> {
    SERIES_RULES
        .iter()
        .find_map(|rule| (rule.matcher)(title).map(|m| (rule.name, m)))
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

static SEASON_EPISODE: Lazy<Option<Regex>> = Lazy::new(|| compile(r"(?i)S(\d{1,2})E(\d{1,4})"));
static SEASON_EPISODE_SEPARATED: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"(?i)S(\d{1,2})[\s_\-]+E(\d{1,4})"));
static ANIME_ABSOLUTE: Lazy<Option<Regex>> = Lazy::new(|| compile(r"-\s+(\d{2,4})\s"));
static SEASON_PHRASE: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"(?i)Season[\s._\-]*(\d{1,2})"));
static BARE_SEASON: Lazy<Option<Regex>> = Lazy::new(|| compile(r"(?i)S(\d{1,2})"));

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// `S01E01` / `s1e1`.
fn match_season_episode(title: &str) -> Option<SeriesMatch> {
    let caps = SEASON_EPISODE.as_ref()?.captures(title)?;
    Some(SeriesMatch::episode(
        Some(number(&caps, 1)?),
        number(&caps, 2)?,
    ))
}

/// `S01 E01`, `S01-E01`, `S01_E01`.
fn match_season_episode_separated(title: &str) -> Option<SeriesMatch> {
    let caps = SEASON_EPISODE_SEPARATED.as_ref()?.captures(title)?;
    Some(SeriesMatch::episode(
        Some(number(&caps, 1)?),
        number(&caps, 2)?,
    ))
}

/// `Title - 54 [1080p]`: absolute episode number, season unknown.
fn match_anime_absolute(title: &str) -> Option<SeriesMatch> {
    let caps = ANIME_ABSOLUTE.as_ref()?.captures(title)?;
    Some(SeriesMatch::episode(None, number(&caps, 1)?))
}

/// `Season 3`, `Season.02`, `season2`.
fn match_season_phrase(title: &str) -> Option<SeriesMatch> {
    let caps = SEASON_PHRASE.as_ref()?.captures(title)?;
    Some(SeriesMatch::season_pack(number(&caps, 1)?))
}

/// `S03` standing alone: not glued to a preceding word, not followed by
/// more digits or by `E<digits>`.
fn match_bare_season(title: &str) -> Option<SeriesMatch> {
    let re = BARE_SEASON.as_ref()?;
    re.captures_iter(title).find_map(|caps| {
        let whole = caps.get(0)?;
        let before = title[..whole.start()].chars().next_back();
        if before.is_some_and(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        let mut after = title[whole.end()..].chars();
        match after.next() {
            Some(c) if c.is_ascii_digit() => return None,
            Some('e') | Some('E') if after.next().is_some_and(|c| c.is_ascii_digit()) => {
                return None
            }
            _ => {}
        }

        Some(SeriesMatch::season_pack(number(&caps, 1)?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = SERIES_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "season_episode",
                "season_episode_separated",
                "anime_absolute",
                "season_phrase",
                "bare_season",
            ]
        );
    }

    #[test]
    fn test_season_episode() {
        assert_eq!(
            match_season_episode("Show.S02E05.1080p"),
            Some(SeriesMatch::episode(Some(2), 5))
        );
        assert_eq!(
            match_season_episode("show s1e9 720p"),
            Some(SeriesMatch::episode(Some(1), 9))
        );
        assert_eq!(match_season_episode("Show S02 E05"), None);
    }

    #[test]
    fn test_season_episode_separated() {
        for title in ["Show S02 E05", "Show S02-E05", "Show_S02_E05", "Show S02 - E05"] {
            assert_eq!(
                match_season_episode_separated(title),
                Some(SeriesMatch::episode(Some(2), 5)),
                "{title}"
            );
        }
    }

    #[test]
    fn test_anime_absolute() {
        assert_eq!(
            match_anime_absolute("[SubsPlease] Anime - 54 [720p]"),
            Some(SeriesMatch::episode(None, 54))
        );
        assert_eq!(match_anime_absolute("Anime - 5 [720p]"), None);
        assert_eq!(match_anime_absolute("Anime -54 [720p]"), None);
    }

    #[test]
    fn test_season_phrase() {
        assert_eq!(
            match_season_phrase("Show Season 3 1080p"),
            Some(SeriesMatch::season_pack(3))
        );
        assert_eq!(
            match_season_phrase("Show.Season.2.Complete"),
            Some(SeriesMatch::season_pack(2))
        );
        assert_eq!(
            match_season_phrase("Show_Season_02_720p"),
            Some(SeriesMatch::season_pack(2))
        );
        assert_eq!(
            match_season_phrase("Show season2"),
            Some(SeriesMatch::season_pack(2))
        );
    }

    #[test]
    fn test_bare_season() {
        assert_eq!(
            match_bare_season("Show.S03.1080p.WEB"),
            Some(SeriesMatch::season_pack(3))
        );
        assert_eq!(match_bare_season("Show.S03E01.1080p"), None);
        assert_eq!(match_bare_season("Show S100"), None);
        assert_eq!(match_bare_season("Mass Effect"), None);
        assert_eq!(match_bare_season("HEVCS01"), None);
    }

    #[test]
    fn test_first_match_reports_rule() {
        let (name, m) = first_match("Show S02 E05").unwrap();
        assert_eq!(name, "season_episode_separated");
        assert_eq!(m.episode, Some(5));

        assert!(first_match("Random.Movie.2023.1080p").is_none());
    }
}
