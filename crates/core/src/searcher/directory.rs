//! Cached list of the indexers a user can filter by.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::Searcher;

/// An indexer the user can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexerEntry {
    pub id: String,
    pub label: String,
}

struct CachedIndexers {
    entries: Vec<IndexerEntry>,
    fetched_at: Instant,
}

/// Enabled indexers, refreshed from the searcher once the cached copy is
/// older than the TTL.
pub struct IndexerDirectory {
    searcher: Arc<dyn Searcher>,
    ttl: Duration,
    cache: RwLock<Option<CachedIndexers>>,
}

impl IndexerDirectory {
    pub fn new(searcher: Arc<dyn Searcher>, ttl: Duration) -> Self {
        Self {
            searcher,
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Enabled indexers in configured order.
    pub async fn list(&self) -> Vec<IndexerEntry> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return cached.entries.clone();
                }
            }
        }

        let entries: Vec<IndexerEntry> = self
            .searcher
            .indexer_status()
            .await
            .into_iter()
            .filter(|s| s.enabled)
            .map(|s| IndexerEntry {
                id: s.id,
                label: s.label,
            })
            .collect();

        debug!(
            searcher = self.searcher.name(),
            count = entries.len(),
            "Refreshed indexer directory"
        );

        *self.cache.write().await = Some(CachedIndexers {
            entries: entries.clone(),
            fetched_at: Instant::now(),
        });

        entries
    }

    /// Label for an indexer id, falling back to the id itself.
    pub async fn label_for(&self, id: &str) -> String {
        self.list()
            .await
            .into_iter()
            .find(|e| e.id == id)
            .map(|e| e.label)
            .unwrap_or_else(|| id.to_string())
    }

    /// Force the next read to refresh.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearcher;

    #[tokio::test]
    async fn test_list_skips_disabled() {
        let searcher = Arc::new(MockSearcher::with_indexers(&[("a", true), ("b", false)]));
        let directory = IndexerDirectory::new(searcher, Duration::from_secs(60));

        let list = directory.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "a");
    }

    #[tokio::test]
    async fn test_list_is_cached_within_ttl() {
        let searcher = Arc::new(MockSearcher::with_indexers(&[("a", true)]));
        let directory = IndexerDirectory::new(searcher.clone(), Duration::from_secs(60));

        directory.list().await;
        directory.list().await;
        assert_eq!(searcher.status_calls().await, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refreshes() {
        let searcher = Arc::new(MockSearcher::with_indexers(&[("a", true)]));
        let directory = IndexerDirectory::new(searcher.clone(), Duration::ZERO);

        directory.list().await;
        directory.list().await;
        assert_eq!(searcher.status_calls().await, 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let searcher = Arc::new(MockSearcher::with_indexers(&[("a", true)]));
        let directory = IndexerDirectory::new(searcher.clone(), Duration::from_secs(60));

        directory.list().await;
        directory.invalidate().await;
        directory.list().await;
        assert_eq!(searcher.status_calls().await, 2);
    }

    #[tokio::test]
    async fn test_label_for_falls_back_to_id() {
        let searcher = Arc::new(MockSearcher::with_indexers(&[("a", true)]));
        let directory = IndexerDirectory::new(searcher, Duration::from_secs(60));

        assert_eq!(directory.label_for("a").await, "A");
        assert_eq!(directory.label_for("zzz").await, "zzz");
    }
}
