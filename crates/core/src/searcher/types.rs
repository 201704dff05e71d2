//! Types for the torrent search system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Query parameters for a torrent search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search query.
    pub query: String,
    /// Optional: limit to one indexer. `None` searches every enabled indexer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexer: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            indexer: None,
        }
    }

    pub fn with_indexer(mut self, indexer: impl Into<String>) -> Self {
        self.indexer = Some(indexer.into());
        self
    }
}

/// Raw result from a single indexer, as returned by the search proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub title: String,
    /// Magnet URI, direct .torrent URL, or empty when the indexer gave neither.
    pub locator: String,
    pub size_bytes: u64,
    pub seeders: u32,
    /// Id of the indexer that returned this result.
    pub indexer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Results of one aggregate search, before classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Records from every indexer that answered, in indexer order.
    pub raw: Vec<RawResult>,
    /// Indexers that failed (id -> error message). They contributed nothing.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub indexer_errors: HashMap<String, String>,
    /// How long the search took in milliseconds.
    pub duration_ms: u64,
}

/// Status of a single configured indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerStatus {
    /// Indexer id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Whether this indexer is queried.
    pub enabled: bool,
    /// When this indexer last answered successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    /// Last error from this indexer, cleared on the next success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search backend API error: {0}")]
    ApiError(String),

    #[error("Indexer not found: {0}")]
    IndexerNotFound(String),

    #[error("No enabled indexers")]
    NoIndexers,

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for torrent search backends.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Query every selected indexer concurrently.
    ///
    /// A failing indexer is recorded in `indexer_errors` and contributes no
    /// records; it never fails the whole search.
    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError>;

    /// Get status of all configured indexers.
    async fn indexer_status(&self) -> Vec<IndexerStatus>;
}
