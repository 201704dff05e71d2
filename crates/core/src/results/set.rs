use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::searcher::RawResult;

use super::{Item, SortMode};

/// Revisions are unique across every result set in the process, so a
/// button rendered for one search can never address another.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// The classified results of one search.
///
/// The full pool is kept; the visible list is re-derived from it on every
/// sort or filter change and never patched in place.
#[derive(Debug, Clone)]
pub struct ResultSet {
    pool: Vec<Item>,
    sort: SortMode,
    indexer_filter: Option<String>,
    visible: Vec<Item>,
    revision: u64,
}

/// Classify raw records and derive the visible list.
pub fn aggregate(raw: Vec<RawResult>, sort: SortMode) -> ResultSet {
    ResultSet::new(raw.into_iter().map(Item::new).collect(), sort)
}

impl ResultSet {
    pub fn new(pool: Vec<Item>, sort: SortMode) -> Self {
        let mut set = Self {
            pool,
            sort,
            indexer_filter: None,
            visible: Vec::new(),
            revision: 0,
        };
        set.derive();
        set
    }

    /// Filter, stable sort, then dedup so the best duplicate under the
    /// current sort survives.
    fn derive(&mut self) {
        let mut items: Vec<Item> = self
            .pool
            .iter()
            .filter(|item| match &self.indexer_filter {
                Some(id) => &item.raw.indexer == id,
                None => true,
            })
            .cloned()
            .collect();

        match self.sort {
            SortMode::SeedersDesc => items.sort_by(|a, b| b.raw.seeders.cmp(&a.raw.seeders)),
            // None < Some, so unknown dates end up last
            SortMode::NewestDesc => {
                items.sort_by(|a, b| b.raw.published_at.cmp(&a.raw.published_at))
            }
        }

        let mut seen = HashSet::new();
        items.retain(|item| seen.insert(item.dedup_key()));

        self.visible = items;
        self.revision = next_revision();

        debug!(
            pool = self.pool.len(),
            visible = self.visible.len(),
            sort = self.sort.token(),
            indexer = ?self.indexer_filter,
            revision = self.revision,
            "Derived result set"
        );
    }

    pub fn items(&self) -> &[Item] {
        &self.visible
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.visible.get(index)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Number of records before filtering and dedup.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub fn indexer_filter(&self) -> Option<&str> {
        self.indexer_filter.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        if self.sort != sort {
            self.sort = sort;
            self.derive();
        }
    }

    pub fn set_indexer_filter(&mut self, indexer: Option<String>) {
        if self.indexer_filter != indexer {
            self.indexer_filter = indexer;
            self.derive();
        }
    }

    /// Distinct indexer ids in the pool, in first-seen order.
    pub fn indexers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.pool
            .iter()
            .filter(|item| seen.insert(item.raw.indexer.as_str()))
            .map(|item| item.raw.indexer.clone())
            .collect()
    }

    pub fn series_count(&self) -> usize {
        self.visible.iter().filter(|i| i.parsed.is_series).count()
    }

    pub fn movie_count(&self) -> usize {
        self.visible.len() - self.series_count()
    }
}
