use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nightleech_core::{Config, ImdbClient, IndexerDirectory, Searcher, SessionStore, TorrentClient};

/// Default indexer cache lifetime when no Jackett section is configured.
const DEFAULT_INDEXER_TTL_SECS: u64 = 300;

/// Shared state handed to every handler.
pub struct BotState {
    pub config: Config,
    pub searcher: Arc<dyn Searcher>,
    pub indexers: IndexerDirectory,
    pub client: Arc<dyn TorrentClient>,
    /// `None` when title suggestions are disabled.
    pub imdb: Option<ImdbClient>,
    pub sessions: SessionStore,
}

impl BotState {
    pub fn new(
        config: Config,
        searcher: Arc<dyn Searcher>,
        client: Arc<dyn TorrentClient>,
        imdb: Option<ImdbClient>,
    ) -> Self {
        let ttl = config
            .jackett
            .as_ref()
            .map(|j| j.indexer_cache_ttl_secs)
            .unwrap_or(DEFAULT_INDEXER_TTL_SECS);

        Self {
            indexers: IndexerDirectory::new(searcher.clone(), Duration::from_secs(ttl)),
            config,
            searcher,
            client,
            imdb,
            sessions: SessionStore::new(),
        }
    }

    /// Whether a Telegram user may talk to the bot.
    pub fn is_allowed(&self, user_id: Option<u64>) -> bool {
        match (&self.config.telegram, user_id) {
            (Some(telegram), Some(id)) => telegram.is_allowed(id),
            (Some(telegram), None) => telegram.allowed_users.is_empty(),
            (None, _) => true,
        }
    }

    /// Indexer id to display label.
    pub async fn indexer_labels(&self) -> HashMap<String, String> {
        self.indexers
            .list()
            .await
            .into_iter()
            .map(|e| (e.id, e.label))
            .collect()
    }

    pub fn public_url(&self) -> Option<&str> {
        self.config.dashboard.public_url.as_deref()
    }
}
