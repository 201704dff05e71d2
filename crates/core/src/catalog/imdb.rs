//! IMDb title suggestions.
//!
//! Uses the public suggestion endpoint that backs IMDb's search box. No API
//! key is needed.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ImdbConfig;

use super::{CatalogError, TitleSuggestion};

/// Queries shorter than this return no suggestions.
pub const MIN_QUERY_LEN: usize = 2;

/// IMDb suggestion client.
pub struct ImdbClient {
    client: Client,
    config: ImdbConfig,
}

impl ImdbClient {
    pub fn new(config: ImdbConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    fn suggestion_url(&self, query: &str) -> Option<String> {
        let first = query.chars().next()?.to_lowercase().to_string();
        Some(format!(
            "{}/{}/{}.json",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&first),
            urlencoding::encode(query)
        ))
    }

    /// Suggestions for a partial title, best first.
    pub async fn suggest(&self, query: &str) -> Result<Vec<TitleSuggestion>, CatalogError> {
        if !self.config.enabled {
            return Err(CatalogError::Disabled);
        }

        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        let Some(url) = self.suggestion_url(query) else {
            return Ok(Vec::new());
        };

        debug!(query = query, "IMDb suggestion lookup");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api { status, message });
        }

        let data: SuggestionResponse = response.json().await?;

        Ok(data
            .d
            .into_iter()
            .filter(|e| !e.l.is_empty())
            .take(self.config.max_results)
            .map(SuggestionEntry::into_suggestion)
            .collect())
    }
}

// IMDb suggestion response types
#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    d: Vec<SuggestionEntry>,
}

#[derive(Debug, Deserialize)]
struct SuggestionEntry {
    #[serde(default)]
    id: String,
    /// Title.
    #[serde(default)]
    l: String,
    /// Year.
    y: Option<u32>,
    /// Kind, e.g. "TV series".
    q: Option<String>,
    /// Poster.
    i: Option<SuggestionImage>,
}

#[derive(Debug, Deserialize)]
struct SuggestionImage {
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

impl SuggestionEntry {
    fn into_suggestion(self) -> TitleSuggestion {
        TitleSuggestion {
            id: self.id,
            title: self.l,
            year: self.y,
            kind: self.q,
            poster_url: self.i.and_then(|i| i.image_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ImdbClient {
        ImdbClient::new(ImdbConfig::default()).unwrap()
    }

    #[test]
    fn test_suggestion_url() {
        let url = client().suggestion_url("The Expanse").unwrap();
        assert_eq!(
            url,
            "https://v2.sg.media-imdb.com/suggestion/t/The%20Expanse.json"
        );
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let mut config = ImdbConfig::default();
        // Unroutable; a request would fail
        config.base_url = "http://127.0.0.1:1".to_string();
        let client = ImdbClient::new(config).unwrap();

        assert!(client.suggest("a").await.unwrap().is_empty());
        assert!(client.suggest("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled() {
        let config = ImdbConfig {
            enabled: false,
            ..ImdbConfig::default()
        };
        let client = ImdbClient::new(config).unwrap();
        assert!(matches!(
            client.suggest("expanse").await,
            Err(CatalogError::Disabled)
        ));
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "d": [
                {"i": {"height": 1, "imageUrl": "https://img/1.jpg", "width": 1},
                 "id": "tt3230854", "l": "The Expanse", "q": "TV series", "y": 2015},
                {"id": "nm0000001", "l": "Someone"},
                {"id": "tt0", "l": ""}
            ],
            "q": "the expanse",
            "v": 1
        }"#;
        let data: SuggestionResponse = serde_json::from_str(json).unwrap();
        let suggestions: Vec<TitleSuggestion> = data
            .d
            .into_iter()
            .filter(|e| !e.l.is_empty())
            .map(SuggestionEntry::into_suggestion)
            .collect();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].display(), "The Expanse (2015)");
        assert_eq!(suggestions[0].search_text(), "The Expanse 2015");
        assert_eq!(suggestions[0].poster_url.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(suggestions[1].year, None);
        assert_eq!(suggestions[1].search_text(), "Someone");
    }
}
