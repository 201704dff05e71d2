use serde::Serialize;

use crate::results::ResultSet;
use crate::title::Quality;

use super::Transition;

/// Which view a conversation is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Not yet decided; resolved once per search.
    #[default]
    Auto,
    /// Season list.
    Series,
    /// Flat list with sort and indexer controls.
    Movie,
    /// Quality list of one season.
    Season,
    /// Episode list of one season and quality.
    Quality,
}

/// Per-conversation navigation position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub mode: Mode,
    pub current_season: Option<u32>,
    pub current_quality: Option<Quality>,
    pub page: usize,
    pub episode_page: usize,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series view when series items are at least as many as movie items.
    pub fn resolve_auto(mut self, results: &ResultSet) -> Self {
        if self.mode == Mode::Auto {
            self.mode = if results.series_count() >= results.movie_count() {
                Mode::Series
            } else {
                Mode::Movie
            };
        }
        self
    }

    /// The state after `transition`.
    ///
    /// Entering a season always starts from a clean quality and episode
    /// position, so revisiting a season renders the same view.
    pub fn apply(&self, transition: &Transition) -> Self {
        let mut next = *self;
        match transition {
            Transition::Season(season) => {
                next.mode = Mode::Season;
                next.current_season = Some(*season);
                next.current_quality = None;
                next.page = 0;
                next.episode_page = 0;
            }
            Transition::Quality(quality) => {
                next.mode = Mode::Quality;
                next.current_quality = Some(*quality);
                next.episode_page = 0;
            }
            Transition::BackSeasons => {
                next.mode = Mode::Series;
                next.current_season = None;
                next.current_quality = None;
                next.page = 0;
                next.episode_page = 0;
            }
            Transition::BackQuality => {
                next.mode = Mode::Season;
                next.current_quality = None;
                next.episode_page = 0;
            }
            Transition::AllRaw => {
                next.mode = Mode::Movie;
                next.current_season = None;
                next.current_quality = None;
                next.page = 0;
                next.episode_page = 0;
            }
            Transition::Page(page) => next.page = *page,
            Transition::EpisodePage(page) => next.episode_page = *page,
            Transition::Sort(_) | Transition::Indexer(_) | Transition::IndexerAll => {
                next.page = 0;
            }
            Transition::Back => next = NavigationState::new(),
            Transition::Download { .. } => {}
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{aggregate, SortMode};
    use crate::testing::fixtures;

    #[test]
    fn test_auto_prefers_series_on_tie() {
        let results = aggregate(
            vec![
                fixtures::raw("Show.S01E01.720p", 1),
                fixtures::raw("Movie.2020.1080p", 1),
            ],
            SortMode::SeedersDesc,
        );
        assert_eq!(NavigationState::new().resolve_auto(&results).mode, Mode::Series);
    }

    #[test]
    fn test_auto_picks_movie_when_movies_dominate() {
        let results = aggregate(
            vec![
                fixtures::raw("Show.S01E01.720p", 1),
                fixtures::raw("Movie.2020.1080p", 1),
                fixtures::raw("Other.Movie.2019.720p", 1),
            ],
            SortMode::SeedersDesc,
        );
        assert_eq!(NavigationState::new().resolve_auto(&results).mode, Mode::Movie);
    }

    #[test]
    fn test_auto_is_resolved_once() {
        let results = aggregate(vec![fixtures::raw("Movie.2020.1080p", 1)], SortMode::SeedersDesc);
        let state = NavigationState {
            mode: Mode::Series,
            ..Default::default()
        };
        assert_eq!(state.resolve_auto(&results).mode, Mode::Series);
    }

    #[test]
    fn test_season_resets_inner_position() {
        let state = NavigationState {
            mode: Mode::Quality,
            current_season: Some(1),
            current_quality: Some(Quality::P720),
            page: 3,
            episode_page: 2,
        };

        let next = state.apply(&Transition::Season(2));
        assert_eq!(next.mode, Mode::Season);
        assert_eq!(next.current_season, Some(2));
        assert_eq!(next.current_quality, None);
        assert_eq!(next.page, 0);
        assert_eq!(next.episode_page, 0);
    }

    #[test]
    fn test_quality_resets_episode_page() {
        let state = NavigationState {
            mode: Mode::Season,
            current_season: Some(1),
            episode_page: 4,
            ..Default::default()
        };
        let next = state.apply(&Transition::Quality(Quality::P1080));
        assert_eq!(next.mode, Mode::Quality);
        assert_eq!(next.current_quality, Some(Quality::P1080));
        assert_eq!(next.current_season, Some(1));
        assert_eq!(next.episode_page, 0);
    }

    #[test]
    fn test_back_quality_keeps_season() {
        let state = NavigationState {
            mode: Mode::Quality,
            current_season: Some(3),
            current_quality: Some(Quality::P720),
            ..Default::default()
        };
        let next = state.apply(&Transition::BackQuality);
        assert_eq!(next.mode, Mode::Season);
        assert_eq!(next.current_season, Some(3));
        assert_eq!(next.current_quality, None);
    }

    #[test]
    fn test_sort_and_filter_reset_page() {
        let state = NavigationState {
            mode: Mode::Movie,
            page: 5,
            ..Default::default()
        };
        assert_eq!(state.apply(&Transition::Sort(SortMode::NewestDesc)).page, 0);
        assert_eq!(state.apply(&Transition::Indexer("x".into())).page, 0);
        assert_eq!(state.apply(&Transition::IndexerAll).page, 0);
        assert_eq!(state.apply(&Transition::Page(2)).page, 2);
    }

    #[test]
    fn test_back_clears_everything() {
        let state = NavigationState {
            mode: Mode::Quality,
            current_season: Some(3),
            current_quality: Some(Quality::P720),
            page: 1,
            episode_page: 1,
        };
        assert_eq!(state.apply(&Transition::Back), NavigationState::new());
    }
}
