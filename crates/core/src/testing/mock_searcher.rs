//! Mock searcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::searcher::{
    IndexerStatus, RawResult, SearchError, SearchOutcome, SearchQuery, Searcher,
};

/// Mock implementation of the Searcher trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable raw results, filtered by the requested indexer
/// - Track search queries for assertions
/// - Simulate per-indexer failures, whole-search failures and delays
///
/// # Example
///
/// ```rust,ignore
/// use nightleech_core::testing::{fixtures, MockSearcher};
///
/// let searcher = MockSearcher::new();
/// searcher.set_results(vec![fixtures::raw("Show.S01E01.720p", 10)]).await;
///
/// let outcome = searcher.search(&SearchQuery::new("show")).await?;
/// assert_eq!(outcome.raw.len(), 1);
/// assert_eq!(searcher.recorded_searches().await.len(), 1);
/// ```
pub struct MockSearcher {
    results: Arc<RwLock<Vec<RawResult>>>,
    searches: Arc<RwLock<Vec<SearchQuery>>>,
    next_error: Arc<RwLock<Option<SearchError>>>,
    indexer_errors: Arc<RwLock<HashMap<String, String>>>,
    indexers: Arc<RwLock<Vec<IndexerStatus>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    status_calls: AtomicUsize,
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    /// Create a new mock searcher with one enabled indexer and no results.
    pub fn new() -> Self {
        Self::with_indexers(&[("test", true)])
    }

    /// Create a mock searcher with the given indexers. Labels are the
    /// upper-cased ids.
    pub fn with_indexers(indexers: &[(&str, bool)]) -> Self {
        let indexers = indexers
            .iter()
            .map(|(id, enabled)| IndexerStatus {
                id: id.to_string(),
                label: id.to_uppercase(),
                enabled: *enabled,
                last_used: None,
                last_error: None,
            })
            .collect();

        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            indexer_errors: Arc::new(RwLock::new(HashMap::new())),
            indexers: Arc::new(RwLock::new(indexers)),
            delay: Arc::new(RwLock::new(None)),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Set the results to return from searches.
    pub async fn set_results(&self, results: Vec<RawResult>) {
        *self.results.write().await = results;
    }

    /// Make the next search fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Report an indexer as failed in every outcome.
    pub async fn set_indexer_error(&self, indexer: &str, error: &str) {
        self.indexer_errors
            .write()
            .await
            .insert(indexer.to_string(), error.to_string());
    }

    /// Delay every search.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get all recorded searches.
    pub async fn recorded_searches(&self) -> Vec<SearchQuery> {
        self.searches.read().await.clone()
    }

    /// How many times `indexer_status` was called.
    pub async fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Searcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        self.searches.write().await.push(query.clone());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let indexer_errors = self.indexer_errors.read().await.clone();
        let raw = self
            .results
            .read()
            .await
            .iter()
            .filter(|r| match &query.indexer {
                Some(id) => &r.indexer == id,
                None => true,
            })
            .filter(|r| !indexer_errors.contains_key(&r.indexer))
            .cloned()
            .collect();

        Ok(SearchOutcome {
            raw,
            indexer_errors,
            duration_ms: 1,
        })
    }

    async fn indexer_status(&self) -> Vec<IndexerStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.indexers.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_mock_filters_by_indexer() {
        let searcher = MockSearcher::new();
        searcher
            .set_results(vec![
                fixtures::raw_from("A", 1, "eztv"),
                fixtures::raw_from("B", 1, "yts"),
            ])
            .await;

        let outcome = searcher
            .search(&SearchQuery::new("x").with_indexer("yts"))
            .await
            .unwrap();
        assert_eq!(outcome.raw.len(), 1);
        assert_eq!(outcome.raw[0].title, "B");
        assert_eq!(searcher.recorded_searches().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_failed_indexer_contributes_nothing() {
        let searcher = MockSearcher::new();
        searcher
            .set_results(vec![
                fixtures::raw_from("A", 1, "eztv"),
                fixtures::raw_from("B", 1, "yts"),
            ])
            .await;
        searcher.set_indexer_error("eztv", "timeout").await;

        let outcome = searcher.search(&SearchQuery::new("x")).await.unwrap();
        assert_eq!(outcome.raw.len(), 1);
        assert!(outcome.indexer_errors.contains_key("eztv"));
    }

    #[tokio::test]
    async fn test_mock_next_error_is_consumed() {
        let searcher = MockSearcher::new();
        searcher.set_next_error(SearchError::NoIndexers).await;

        assert!(searcher.search(&SearchQuery::new("x")).await.is_err());
        assert!(searcher.search(&SearchQuery::new("x")).await.is_ok());
    }
}
