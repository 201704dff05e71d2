//! Jackett search backend implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::JackettConfig;

use super::{IndexerStatus, RawResult, SearchError, SearchOutcome, SearchQuery, Searcher};

/// Internal state for tracking an indexer.
#[derive(Debug)]
struct IndexerState {
    enabled: bool,
    last_used: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Jackett search backend implementation.
pub struct JackettSearcher {
    client: Client,
    config: JackettConfig,
    indexer_state: RwLock<HashMap<String, IndexerState>>,
}

impl JackettSearcher {
    /// Create a new JackettSearcher with the given configuration.
    ///
    /// `timeout_secs` bounds every single indexer call.
    pub fn new(config: JackettConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let indexer_state = config
            .indexers
            .iter()
            .map(|i| {
                (
                    i.id.clone(),
                    IndexerState {
                        enabled: i.enabled,
                        last_used: None,
                        last_error: None,
                    },
                )
            })
            .collect();

        Ok(Self {
            client,
            config,
            indexer_state: RwLock::new(indexer_state),
        })
    }

    /// Build the Jackett API URL for a search.
    fn build_search_url(&self, query: &str, indexer: &str) -> String {
        format!(
            "{}/api/v2.0/indexers/{}/results?apikey={}&Query={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(indexer),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(query)
        )
    }

    /// Indexers to query for this search, in configured order.
    async fn select_indexers(&self, query: &SearchQuery) -> Result<Vec<String>, SearchError> {
        let state = self.indexer_state.read().await;
        let enabled = |id: &str| state.get(id).map(|s| s.enabled).unwrap_or(false);

        match &query.indexer {
            Some(requested) if enabled(requested) => Ok(vec![requested.clone()]),
            Some(requested) => Err(SearchError::IndexerNotFound(requested.clone())),
            None => {
                let ids: Vec<String> = self
                    .config
                    .indexers
                    .iter()
                    .filter(|i| enabled(&i.id))
                    .map(|i| i.id.clone())
                    .collect();
                if ids.is_empty() {
                    Err(SearchError::NoIndexers)
                } else {
                    Ok(ids)
                }
            }
        }
    }

    /// Search a single indexer.
    async fn search_indexer(
        &self,
        query: &str,
        indexer: &str,
    ) -> Result<Vec<RawResult>, SearchError> {
        let url = self.build_search_url(query, indexer);
        debug!(indexer = indexer, "Searching Jackett");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let jackett_response: JackettResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ApiError(format!("Failed to parse response: {}", e)))?;

        debug!(
            indexer = indexer,
            results = jackett_response.Results.len(),
            "Jackett search complete"
        );

        Ok(jackett_response
            .Results
            .into_iter()
            .map(|r| RawResult {
                locator: pick_locator(r.MagnetUri, r.Link),
                title: r.Title,
                indexer: indexer.to_string(),
                size_bytes: r.Size.unwrap_or(0).max(0) as u64,
                seeders: r.Seeders.unwrap_or(0).max(0) as u32,
                published_at: r.PublishDate.and_then(|d| parse_jackett_date(&d)),
            })
            .collect())
    }

    async fn record_success(&self, indexer: &str) {
        let mut state = self.indexer_state.write().await;
        if let Some(s) = state.get_mut(indexer) {
            s.last_used = Some(Utc::now());
            s.last_error = None;
        }
    }

    async fn record_failure(&self, indexer: &str, error: &SearchError) {
        let mut state = self.indexer_state.write().await;
        if let Some(s) = state.get_mut(indexer) {
            s.last_error = Some(error.to_string());
        }
    }
}

#[async_trait]
impl Searcher for JackettSearcher {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        let start = Instant::now();
        let indexers_to_search = self.select_indexers(query).await?;

        debug!(
            indexers = ?indexers_to_search,
            query = %query.query,
            "Starting parallel search"
        );

        // Wait for every indexer; one failure must not cancel the others.
        let search_futures: Vec<_> = indexers_to_search
            .iter()
            .map(|indexer| async move {
                let result = self.search_indexer(&query.query, indexer).await;
                (indexer.clone(), result)
            })
            .collect();

        let results = futures::future::join_all(search_futures).await;

        let mut raw: Vec<RawResult> = Vec::new();
        let mut indexer_errors: HashMap<String, String> = HashMap::new();

        for (indexer, result) in results {
            match result {
                Ok(mut torrents) => {
                    self.record_success(&indexer).await;
                    raw.append(&mut torrents);
                }
                Err(e) => {
                    warn!(indexer = %indexer, error = %e, "Indexer search failed");
                    self.record_failure(&indexer, &e).await;
                    indexer_errors.insert(indexer, e.to_string());
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            results = raw.len(),
            failed = indexer_errors.len(),
            duration_ms = duration_ms,
            "Search complete"
        );

        Ok(SearchOutcome {
            raw,
            indexer_errors,
            duration_ms,
        })
    }

    async fn indexer_status(&self) -> Vec<IndexerStatus> {
        let state = self.indexer_state.read().await;

        self.config
            .indexers
            .iter()
            .map(|cfg| {
                let s = state.get(&cfg.id);
                IndexerStatus {
                    id: cfg.id.clone(),
                    label: cfg.display_label().to_string(),
                    enabled: s.map(|s| s.enabled).unwrap_or(cfg.enabled),
                    last_used: s.and_then(|s| s.last_used),
                    last_error: s.and_then(|s| s.last_error.clone()),
                }
            })
            .collect()
    }
}

/// Choose the locator for a result: a magnet URI when one is offered,
/// otherwise a direct http(s) download link, otherwise empty.
fn pick_locator(magnet_uri: Option<String>, link: Option<String>) -> String {
    let is_magnet = |s: &str| s.starts_with("magnet:");
    let is_http = |s: &str| s.starts_with("http://") || s.starts_with("https://");

    match (magnet_uri, link) {
        (Some(m), _) if is_magnet(&m) => m,
        (_, Some(l)) if is_magnet(&l) || is_http(&l) => l,
        _ => String::new(),
    }
}

/// Parse Jackett's date format.
fn parse_jackett_date(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            // Jackett sometimes omits the offset
            chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

// Jackett API response types
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<JackettResult>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Title: String,
    MagnetUri: Option<String>,
    Link: Option<String>,
    Size: Option<i64>,
    Seeders: Option<i32>,
    PublishDate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexerConfig;
    use chrono::Datelike;

    fn config(indexers: &[(&str, bool)]) -> JackettConfig {
        JackettConfig {
            url: "http://localhost:9117/".to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 30,
            indexer_cache_ttl_secs: 300,
            indexers: indexers
                .iter()
                .map(|(id, enabled)| IndexerConfig {
                    id: id.to_string(),
                    label: None,
                    enabled: *enabled,
                })
                .collect(),
        }
    }

    #[test]
    fn test_parse_jackett_date_rfc3339() {
        let date = parse_jackett_date("2024-06-15T10:30:00Z").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_jackett_date_with_offset() {
        assert!(parse_jackett_date("2024-06-15T10:30:00+02:00").is_some());
    }

    #[test]
    fn test_parse_jackett_date_no_timezone() {
        assert!(parse_jackett_date("2024-06-15T10:30:00").is_some());
    }

    #[test]
    fn test_parse_jackett_date_invalid() {
        assert!(parse_jackett_date("invalid").is_none());
    }

    #[test]
    fn test_pick_locator() {
        let magnet = "magnet:?xt=urn:btih:abc".to_string();
        let link = "http://jackett/dl/1.torrent".to_string();

        assert_eq!(
            pick_locator(Some(magnet.clone()), Some(link.clone())),
            magnet
        );
        assert_eq!(pick_locator(None, Some(link.clone())), link);
        assert_eq!(pick_locator(Some(String::new()), Some(link.clone())), link);
        assert_eq!(pick_locator(None, Some(magnet.clone())), magnet);
        assert_eq!(pick_locator(None, Some("ftp://nope".to_string())), "");
        assert_eq!(pick_locator(None, None), "");
    }

    #[test]
    fn test_build_search_url() {
        let searcher = JackettSearcher::new(config(&[("test", true)])).unwrap();

        let url = searcher.build_search_url("test query", "test");
        assert!(url.starts_with("http://localhost:9117/api/v2.0/indexers/test/results"));
        assert!(url.contains("apikey=test-key"));
        assert!(url.contains("Query=test%20query"));
    }

    #[tokio::test]
    async fn test_select_indexers() {
        let searcher =
            JackettSearcher::new(config(&[("a", true), ("b", false), ("c", true)])).unwrap();

        let all = searcher.select_indexers(&SearchQuery::new("x")).await.unwrap();
        assert_eq!(all, vec!["a".to_string(), "c".to_string()]);

        let one = searcher
            .select_indexers(&SearchQuery::new("x").with_indexer("c"))
            .await
            .unwrap();
        assert_eq!(one, vec!["c".to_string()]);

        let disabled = searcher
            .select_indexers(&SearchQuery::new("x").with_indexer("b"))
            .await;
        assert!(matches!(disabled, Err(SearchError::IndexerNotFound(_))));

        let unknown = searcher
            .select_indexers(&SearchQuery::new("x").with_indexer("zzz"))
            .await;
        assert!(matches!(unknown, Err(SearchError::IndexerNotFound(_))));
    }

    #[tokio::test]
    async fn test_no_enabled_indexers() {
        let searcher = JackettSearcher::new(config(&[("a", false)])).unwrap();
        let result = searcher.search(&SearchQuery::new("x")).await;
        assert!(matches!(result, Err(SearchError::NoIndexers)));
    }

    #[tokio::test]
    async fn test_indexer_status_uses_labels() {
        let mut cfg = config(&[("eztv", true)]);
        cfg.indexers[0].label = Some("EZTV".to_string());
        let searcher = JackettSearcher::new(cfg).unwrap();

        let status = searcher.indexer_status().await;
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].id, "eztv");
        assert_eq!(status[0].label, "EZTV");
        assert!(status[0].enabled);
        assert!(status[0].last_error.is_none());
    }
}
