//! Release title classification.
//!
//! Turns a free-text torrent title into a [`ParsedTitle`]: quality, and
//! whether the title is a series episode, a season pack, or a movie.
//! Classification never fails; fields that cannot be found stay empty.

mod quality;
mod rules;
mod types;

pub use quality::detect_quality;
pub use rules::{first_match, SeriesMatch, SeriesRule, SERIES_RULES};
pub use types::{EpisodeTag, ParsedTitle, Quality};

/// Episodes per season assumed when a title only carries an absolute
/// episode number (common for anime). This is a guess, not a fact about
/// any particular show.
pub const ANIME_EPISODES_PER_SEASON: u32 = 13;

/// Season number inferred from an absolute episode number.
pub fn infer_season(episode: u32) -> u32 {
    (episode.saturating_sub(1) / ANIME_EPISODES_PER_SEASON + 1).max(1)
}

/// Classify a release title.
pub fn classify(title: &str) -> ParsedTitle {
    let quality = detect_quality(title);

    let Some((_, matched)) = first_match(title) else {
        return ParsedTitle::movie(quality);
    };

    if matched.pack {
        return ParsedTitle {
            quality,
            is_series: true,
            season: matched.season,
            episode: None,
            episode_tags: vec![EpisodeTag::Pack],
            is_pack: true,
        };
    }

    let season = match (matched.season, matched.episode) {
        (Some(season), _) => Some(season),
        (None, Some(episode)) => Some(infer_season(episode)),
        (None, None) => None,
    };

    ParsedTitle {
        quality,
        is_series: true,
        season,
        episode: matched.episode,
        episode_tags: matched.episode.map(EpisodeTag::Number).into_iter().collect(),
        is_pack: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_style_does_not_change_result() {
        let compact = classify("Show.S02E05.1080p");
        let spaced = classify("Show S02 E05 1080p");

        for parsed in [&compact, &spaced] {
            assert_eq!(parsed.season, Some(2));
            assert_eq!(parsed.episode, Some(5));
            assert_eq!(parsed.quality, Quality::P1080);
            assert!(parsed.is_series);
            assert!(!parsed.is_pack);
            assert_eq!(parsed.episode_tags, vec![EpisodeTag::Number(5)]);
        }
        assert_eq!(compact, spaced);
    }

    #[test]
    fn test_season_phrase_is_pack() {
        let parsed = classify("Show Season 3 1080p");
        assert_eq!(parsed.season, Some(3));
        assert!(parsed.is_pack);
        assert!(parsed.is_series);
        assert_eq!(parsed.episode, None);
        assert_eq!(parsed.episode_tags, vec![EpisodeTag::Pack]);
    }

    #[test]
    fn test_dotted_season_phrase_is_pack() {
        let parsed = classify("Show.Season.02.720p.WEB-DL");
        assert!(parsed.is_series);
        assert!(parsed.is_pack);
        assert_eq!(parsed.season, Some(2));
        assert_eq!(parsed.quality, Quality::P720);

        let parsed = classify("Show.Season.2.Complete.1080p");
        assert_eq!(parsed.season, Some(2));
        assert!(parsed.is_pack);
    }

    #[test]
    fn test_bare_season_is_pack() {
        let parsed = classify("Show.S04.720p.WEB-DL");
        assert_eq!(parsed.season, Some(4));
        assert!(parsed.is_pack);
        assert_eq!(parsed.quality, Quality::P720);
    }

    #[test]
    fn test_anime_absolute_infers_season() {
        let parsed = classify("Anime - 54 [720p]");
        assert_eq!(parsed.episode, Some(54));
        assert_eq!(parsed.season, Some(5));
        assert_eq!(parsed.quality, Quality::P720);
        assert!(parsed.is_series);
        assert!(!parsed.is_pack);
    }

    #[test]
    fn test_movie_title() {
        let parsed = classify("Random.Movie.2023.1080p");
        assert!(!parsed.is_series);
        assert_eq!(parsed.quality, Quality::P1080);
        assert_eq!(parsed.season, None);
        assert_eq!(parsed.episode, None);
        assert!(parsed.episode_tags.is_empty());
        assert!(!parsed.is_pack);
    }

    #[test]
    fn test_movie_without_quality_is_unknown() {
        let parsed = classify("Old Movie DVDRip");
        assert!(!parsed.is_series);
        assert_eq!(parsed.quality, Quality::Unknown);
    }

    #[test]
    fn test_explicit_episode_beats_season_phrase() {
        let parsed = classify("Show Season 2 S02E07 1080p");
        assert_eq!(parsed.season, Some(2));
        assert_eq!(parsed.episode, Some(7));
        assert!(!parsed.is_pack);
    }

    #[test]
    fn test_anime_number_beats_season_phrase() {
        // Order-dependent: the absolute-number rule runs first.
        let parsed = classify("Anime Season 2 - 27 [1080p]");
        assert_eq!(parsed.episode, Some(27));
        assert_eq!(parsed.season, Some(3));
        assert!(!parsed.is_pack);
    }

    #[test]
    fn test_infer_season() {
        assert_eq!(infer_season(0), 1);
        assert_eq!(infer_season(1), 1);
        assert_eq!(infer_season(13), 1);
        assert_eq!(infer_season(14), 2);
        assert_eq!(infer_season(54), 5);
    }
}
