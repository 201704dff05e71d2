use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::NavigationConfig;
use crate::results::{Item, ResultSet, SortMode};
use crate::title::Quality;

use super::{paginate, Mode, NavigationState, PageInfo, Transition};

/// What kind of screen a view is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewKind {
    Seasons,
    Qualities {
        season: u32,
    },
    Episodes {
        season: u32,
        quality: Quality,
    },
    Flat {
        sort: SortMode,
        indexer: Option<String>,
        /// Indexer ids present in the results, for filter buttons.
        indexers: Vec<String>,
    },
    /// The state points at a season or quality that is not in the results.
    NotFound,
}

/// One line of a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum Row {
    Season {
        season: u32,
        label: String,
        items: usize,
    },
    Quality {
        quality: Quality,
        items: usize,
    },
    Item {
        /// Position in the result set; pairs with the set revision.
        index: usize,
        item: Item,
    },
}

/// A renderable description of the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewDescriptor {
    pub kind: ViewKind,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
    /// Transitions that make sense from this view, rows first.
    pub transitions: Vec<Transition>,
}

impl ViewDescriptor {
    fn not_found() -> Self {
        Self {
            kind: ViewKind::NotFound,
            rows: Vec::new(),
            page: None,
            transitions: vec![Transition::Back],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compute the view for a navigation state over a result set.
pub fn resolve_view(
    nav: &NavigationState,
    results: &ResultSet,
    config: &NavigationConfig,
) -> ViewDescriptor {
    let nav = nav.resolve_auto(results);

    match nav.mode {
        Mode::Auto | Mode::Series => seasons_view(results),
        Mode::Season => match nav.current_season {
            Some(season) => qualities_view(results, season),
            None => ViewDescriptor::not_found(),
        },
        Mode::Quality => match (nav.current_season, nav.current_quality) {
            (Some(season), Some(quality)) => {
                episodes_view(results, season, quality, nav.episode_page, config)
            }
            _ => ViewDescriptor::not_found(),
        },
        Mode::Movie => flat_view(results, nav.page, config),
    }
}

fn series_items(results: &ResultSet) -> impl Iterator<Item = (usize, &Item)> {
    results
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| item.parsed.is_series)
}

fn season_label(items: &[&Item]) -> String {
    if items.iter().all(|i| i.parsed.is_pack) {
        return "Full pack".to_string();
    }
    let episodes: BTreeSet<u32> = items.iter().filter_map(|i| i.parsed.episode).collect();
    match episodes.len() {
        1 => "1 episode".to_string(),
        n => format!("{} episodes", n),
    }
}

fn seasons_view(results: &ResultSet) -> ViewDescriptor {
    let mut groups: BTreeMap<u32, Vec<&Item>> = BTreeMap::new();
    for (_, item) in series_items(results) {
        if let Some(season) = item.parsed.season {
            groups.entry(season).or_default().push(item);
        }
    }

    let rows: Vec<Row> = groups
        .iter()
        .rev()
        .map(|(season, items)| Row::Season {
            season: *season,
            label: season_label(items),
            items: items.len(),
        })
        .collect();

    let mut transitions: Vec<Transition> = groups
        .keys()
        .rev()
        .map(|s| Transition::Season(*s))
        .collect();
    transitions.push(Transition::AllRaw);
    transitions.push(Transition::Back);

    ViewDescriptor {
        kind: ViewKind::Seasons,
        rows,
        page: None,
        transitions,
    }
}

fn qualities_view(results: &ResultSet, season: u32) -> ViewDescriptor {
    let mut groups: BTreeMap<Quality, usize> = BTreeMap::new();
    for (_, item) in series_items(results) {
        if item.parsed.season == Some(season) {
            *groups.entry(item.parsed.quality).or_default() += 1;
        }
    }

    if groups.is_empty() {
        return ViewDescriptor::not_found();
    }

    // Quality orders best first, so the map is already in display order.
    let rows: Vec<Row> = groups
        .iter()
        .map(|(quality, items)| Row::Quality {
            quality: *quality,
            items: *items,
        })
        .collect();

    let mut transitions: Vec<Transition> =
        groups.keys().map(|q| Transition::Quality(*q)).collect();
    transitions.extend([Transition::BackSeasons, Transition::AllRaw, Transition::Back]);

    ViewDescriptor {
        kind: ViewKind::Qualities { season },
        rows,
        page: None,
        transitions,
    }
}

fn episodes_view(
    results: &ResultSet,
    season: u32,
    quality: Quality,
    page: usize,
    config: &NavigationConfig,
) -> ViewDescriptor {
    let mut matching: Vec<(usize, &Item)> = series_items(results)
        .filter(|(_, item)| item.parsed.season == Some(season) && item.parsed.quality == quality)
        .collect();

    if matching.is_empty() {
        return ViewDescriptor::not_found();
    }

    matching.sort_by_key(|(_, item)| (!item.parsed.is_pack, Reverse(item.parsed.episode)));

    let (info, range) = paginate(matching.len(), config.episodes_per_page, page);
    let rows = item_rows(&matching[range]);

    let mut transitions = download_transitions(&rows, results.revision());
    if info.has_prev() {
        transitions.push(Transition::EpisodePage(info.index - 1));
    }
    if info.has_next() {
        transitions.push(Transition::EpisodePage(info.index + 1));
    }
    transitions.extend([Transition::BackQuality, Transition::BackSeasons, Transition::Back]);

    ViewDescriptor {
        kind: ViewKind::Episodes { season, quality },
        rows,
        page: Some(info),
        transitions,
    }
}

fn flat_view(results: &ResultSet, page: usize, config: &NavigationConfig) -> ViewDescriptor {
    let all: Vec<(usize, &Item)> = results.items().iter().enumerate().collect();
    let (info, range) = paginate(all.len(), config.results_per_page, page);
    let rows = item_rows(&all[range]);

    let mut transitions = download_transitions(&rows, results.revision());
    if info.has_prev() {
        transitions.push(Transition::Page(info.index - 1));
    }
    if info.has_next() {
        transitions.push(Transition::Page(info.index + 1));
    }

    let sort = results.sort_mode();
    transitions.extend(
        [SortMode::SeedersDesc, SortMode::NewestDesc]
            .into_iter()
            .filter(|mode| *mode != sort)
            .map(Transition::Sort),
    );

    let indexers = results.indexers();
    let current = results.indexer_filter();
    transitions.extend(
        indexers
            .iter()
            .filter(|id| Some(id.as_str()) != current)
            .map(|id| Transition::Indexer(id.clone())),
    );
    if current.is_some() {
        transitions.push(Transition::IndexerAll);
    }

    if results.series_count() > 0 {
        transitions.push(Transition::BackSeasons);
    }
    transitions.push(Transition::Back);

    ViewDescriptor {
        kind: ViewKind::Flat {
            sort,
            indexer: current.map(str::to_string),
            indexers,
        },
        rows,
        page: Some(info),
        transitions,
    }
}

fn item_rows(items: &[(usize, &Item)]) -> Vec<Row> {
    items
        .iter()
        .map(|(index, item)| Row::Item {
            index: *index,
            item: (*item).clone(),
        })
        .collect()
}

fn download_transitions(rows: &[Row], revision: u64) -> Vec<Transition> {
    rows.iter()
        .filter_map(|row| match row {
            Row::Item { index, .. } => Some(Transition::Download {
                revision,
                index: *index,
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::aggregate;
    use crate::testing::fixtures;

    fn config(results_per_page: usize, episodes_per_page: usize) -> NavigationConfig {
        NavigationConfig {
            results_per_page,
            episodes_per_page,
        }
    }

    fn show() -> ResultSet {
        aggregate(
            vec![
                fixtures::raw("Show.S01E01.720p", 10),
                fixtures::raw("Show.S01E02.720p", 9),
                fixtures::raw("Show.S01E02.1080p", 8),
                fixtures::raw("Show.S02E01.1080p", 7),
                fixtures::raw("Show Season 3 1080p", 6),
                fixtures::raw("Show.S03.720p.WEB", 5),
                fixtures::raw("Show.S01.1080p.Complete", 4),
            ],
            SortMode::SeedersDesc,
        )
    }

    fn state(mode: Mode) -> NavigationState {
        NavigationState {
            mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_seasons_descending_with_labels() {
        let view = resolve_view(&state(Mode::Series), &show(), &config(30, 10));
        assert_eq!(view.kind, ViewKind::Seasons);

        let labels: Vec<(u32, String)> = view
            .rows
            .iter()
            .map(|row| match row {
                Row::Season { season, label, .. } => (*season, label.clone()),
                other => panic!("unexpected row {other:?}"),
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                (3, "Full pack".to_string()),
                (2, "1 episode".to_string()),
                (1, "2 episodes".to_string()),
            ]
        );
        assert_eq!(view.transitions[0], Transition::Season(3));
        assert!(view.transitions.contains(&Transition::AllRaw));
    }

    #[test]
    fn test_qualities_best_first() {
        let nav = state(Mode::Series).apply(&Transition::Season(1));
        let view = resolve_view(&nav, &show(), &config(30, 10));
        assert_eq!(view.kind, ViewKind::Qualities { season: 1 });

        let qualities: Vec<Quality> = view
            .rows
            .iter()
            .filter_map(|row| match row {
                Row::Quality { quality, .. } => Some(*quality),
                _ => None,
            })
            .collect();
        assert_eq!(qualities, vec![Quality::P1080, Quality::P720]);
    }

    #[test]
    fn test_episodes_packs_first_then_descending() {
        let nav = state(Mode::Series)
            .apply(&Transition::Season(1))
            .apply(&Transition::Quality(Quality::P1080));
        let view = resolve_view(&nav, &show(), &config(30, 10));

        let titles: Vec<&str> = view
            .rows
            .iter()
            .filter_map(|row| match row {
                Row::Item { item, .. } => Some(item.title()),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["Show.S01.1080p.Complete", "Show.S01E02.1080p"]);
    }

    #[test]
    fn test_episode_pages_are_clamped() {
        let raw = (1..=13)
            .map(|ep| fixtures::raw(&format!("Show.S01E{ep:02}.1080p"), 20))
            .collect();
        let results = aggregate(raw, SortMode::SeedersDesc);
        let nav = state(Mode::Series)
            .apply(&Transition::Season(1))
            .apply(&Transition::Quality(Quality::P1080));

        let last = resolve_view(
            &nav.apply(&Transition::EpisodePage(2)),
            &results,
            &config(30, 5),
        );
        let page = last.page.unwrap();
        assert_eq!(page.index, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(last.rows.len(), 3);
        assert!(last.transitions.contains(&Transition::EpisodePage(1)));
        assert!(!last.transitions.contains(&Transition::EpisodePage(3)));

        let clamped = resolve_view(
            &nav.apply(&Transition::EpisodePage(99)),
            &results,
            &config(30, 5),
        );
        assert_eq!(clamped.page, last.page);
        assert_eq!(clamped.rows, last.rows);
    }

    #[test]
    fn test_episode_rows_carry_result_indexes() {
        let results = show();
        let nav = state(Mode::Series)
            .apply(&Transition::Season(2))
            .apply(&Transition::Quality(Quality::P1080));
        let view = resolve_view(&nav, &results, &config(30, 10));

        let Row::Item { index, .. } = &view.rows[0] else {
            panic!("expected item row");
        };
        assert_eq!(results.get(*index).unwrap().title(), "Show.S02E01.1080p");
        assert_eq!(
            view.transitions[0],
            Transition::Download {
                revision: results.revision(),
                index: *index
            }
        );
    }

    #[test]
    fn test_flat_pagination_thirteen_by_five() {
        let raw = (0..13)
            .map(|i| fixtures::raw(&format!("Movie {} 1080p", i), 100 - i))
            .collect();
        let results = aggregate(raw, SortMode::SeedersDesc);

        let nav = NavigationState {
            mode: Mode::Movie,
            page: 2,
            ..Default::default()
        };
        let view = resolve_view(&nav, &results, &config(5, 10));

        let page = view.page.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.index, 2);
        assert_eq!(view.rows.len(), 3);
        assert!(view.transitions.contains(&Transition::Page(1)));
        assert!(!view.transitions.contains(&Transition::Page(3)));
    }

    #[test]
    fn test_flat_page_is_clamped() {
        let results = aggregate(vec![fixtures::raw("Movie 1080p", 1)], SortMode::SeedersDesc);
        let nav = NavigationState {
            mode: Mode::Movie,
            page: 7,
            ..Default::default()
        };
        let view = resolve_view(&nav, &results, &config(5, 10));
        assert_eq!(view.page.unwrap().index, 0);
        assert_eq!(view.rows.len(), 1);
    }

    #[test]
    fn test_flat_controls() {
        let mut results = aggregate(
            vec![
                fixtures::raw_from("Movie A 1080p", 1, "eztv"),
                fixtures::raw_from("Movie B 1080p", 2, "yts"),
            ],
            SortMode::SeedersDesc,
        );
        let view = resolve_view(&state(Mode::Movie), &results, &config(30, 10));
        assert!(view.transitions.contains(&Transition::Sort(SortMode::NewestDesc)));
        assert!(!view.transitions.contains(&Transition::Sort(SortMode::SeedersDesc)));
        assert!(view.transitions.contains(&Transition::Indexer("eztv".into())));
        assert!(!view.transitions.contains(&Transition::IndexerAll));

        results.set_indexer_filter(Some("eztv".to_string()));
        let view = resolve_view(&state(Mode::Movie), &results, &config(30, 10));
        assert_eq!(view.rows.len(), 1);
        assert!(view.transitions.contains(&Transition::IndexerAll));
        assert!(!view.transitions.contains(&Transition::Indexer("eztv".into())));
        assert!(view.transitions.contains(&Transition::Indexer("yts".into())));
    }

    #[test]
    fn test_empty_results_render_empty_page() {
        let results = aggregate(Vec::new(), SortMode::SeedersDesc);
        let view = resolve_view(&NavigationState::new(), &results, &config(30, 10));
        assert_eq!(view.kind, ViewKind::Seasons);
        assert!(view.is_empty());

        let flat = resolve_view(&state(Mode::Movie), &results, &config(30, 10));
        assert!(flat.is_empty());
        assert_eq!(flat.page.unwrap().total_pages, 1);
    }

    #[test]
    fn test_stale_season_is_not_found() {
        let nav = state(Mode::Series).apply(&Transition::Season(9));
        let view = resolve_view(&nav, &show(), &config(30, 10));
        assert_eq!(view.kind, ViewKind::NotFound);
        assert_eq!(view.transitions, vec![Transition::Back]);
    }

    #[test]
    fn test_stale_quality_is_not_found() {
        let nav = state(Mode::Series)
            .apply(&Transition::Season(2))
            .apply(&Transition::Quality(Quality::FourK));
        let view = resolve_view(&nav, &show(), &config(30, 10));
        assert_eq!(view.kind, ViewKind::NotFound);
    }

    #[test]
    fn test_revisiting_season_reproduces_view() {
        let results = show();
        let cfg = config(30, 1);
        let first_nav = state(Mode::Series).apply(&Transition::Season(1));
        let first = resolve_view(&first_nav, &results, &cfg);

        let wandered = first_nav
            .apply(&Transition::Quality(Quality::P720))
            .apply(&Transition::EpisodePage(1))
            .apply(&Transition::BackSeasons)
            .apply(&Transition::Season(1));
        let second = resolve_view(&wandered, &results, &cfg);

        assert_eq!(wandered, first_nav);
        assert_eq!(first, second);
    }
}
