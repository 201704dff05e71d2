use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Telegram transport (required by the bot binary only).
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// Search proxy (required by the bot binary only).
    #[serde(default)]
    pub jackett: Option<JackettConfig>,
    #[serde(default)]
    pub qbittorrent: QBittorrentConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub imdb: ImdbConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Telegram user ids allowed to use the bot. Empty means everyone.
    #[serde(default)]
    pub allowed_users: Vec<u64>,
}

impl TelegramConfig {
    pub fn is_allowed(&self, user_id: u64) -> bool {
        self.allowed_users.is_empty() || self.allowed_users.contains(&user_id)
    }
}

/// Page sizes for the paginated chat views
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct NavigationConfig {
    /// Items per page in the flat result list.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: usize,
    /// Items per page in the episode list of one season/quality.
    #[serde(default = "default_episodes_per_page")]
    pub episodes_per_page: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            results_per_page: default_results_per_page(),
            episodes_per_page: default_episodes_per_page(),
        }
    }
}

fn default_results_per_page() -> usize {
    30
}

fn default_episodes_per_page() -> usize {
    10
}

/// Jackett search backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Per-indexer request timeout in seconds (default: 30)
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u32,
    /// How long the indexer list is cached before it is refreshed (default: 300)
    #[serde(default = "default_indexer_cache_ttl")]
    pub indexer_cache_ttl_secs: u64,
    /// Indexers to query, in display order
    #[serde(default)]
    pub indexers: Vec<IndexerConfig>,
}

/// A single Jackett indexer
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct IndexerConfig {
    /// Jackett indexer id (e.g., "eztv")
    pub id: String,
    /// Label shown on filter buttons
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl IndexerConfig {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

fn default_search_timeout() -> u32 {
    30
}

fn default_indexer_cache_ttl() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

/// qBittorrent WebUI configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QBittorrentConfig {
    #[serde(default = "default_qb_url")]
    pub url: String,
    #[serde(default = "default_qb_username")]
    pub username: String,
    #[serde(default = "default_qb_password")]
    pub password: String,
    #[serde(default = "default_qb_timeout")]
    pub timeout_secs: u32,
    /// Save path passed with every added torrent
    #[serde(default)]
    pub download_path: Option<String>,
}

impl Default for QBittorrentConfig {
    fn default() -> Self {
        Self {
            url: default_qb_url(),
            username: default_qb_username(),
            password: default_qb_password(),
            timeout_secs: default_qb_timeout(),
            download_path: None,
        }
    }
}

fn default_qb_url() -> String {
    "http://localhost:8083".to_string()
}

fn default_qb_username() -> String {
    "admin".to_string()
}

fn default_qb_password() -> String {
    "adminadmin".to_string()
}

fn default_qb_timeout() -> u32 {
    15
}

/// Dashboard web server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Root of the file browser and download routes
    #[serde(default = "default_files_dir")]
    pub files_dir: PathBuf,
    /// Public base URL of the dashboard, used for download links in chat
    #[serde(default)]
    pub public_url: Option<String>,
    /// Auto-refresh interval of the transfer page in seconds
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            files_dir: default_files_dir(),
            public_url: None,
            refresh_secs: default_refresh_secs(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8085
}

fn default_files_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_refresh_secs() -> u32 {
    30
}

/// IMDb suggestion lookups for inline queries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImdbConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_imdb_url")]
    pub base_url: String,
    #[serde(default = "default_imdb_timeout")]
    pub timeout_secs: u32,
    #[serde(default = "default_imdb_max_results")]
    pub max_results: usize,
}

impl Default for ImdbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_imdb_url(),
            timeout_secs: default_imdb_timeout(),
            max_results: default_imdb_max_results(),
        }
    }
}

fn default_imdb_url() -> String {
    "https://v2.sg.media-imdb.com/suggestion".to_string()
}

fn default_imdb_timeout() -> u32 {
    10
}

fn default_imdb_max_results() -> usize {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<SanitizedTelegramConfig>,
    pub navigation: NavigationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jackett: Option<SanitizedJackettConfig>,
    pub qbittorrent: SanitizedQBittorrentConfig,
    pub dashboard: DashboardConfig,
    pub imdb: ImdbConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub bot_token_configured: bool,
    pub allowed_users: usize,
}

/// Sanitized Jackett config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedJackettConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub indexers: Vec<IndexerConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedQBittorrentConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            telegram: config.telegram.as_ref().map(|t| SanitizedTelegramConfig {
                bot_token_configured: !t.bot_token.is_empty(),
                allowed_users: t.allowed_users.len(),
            }),
            navigation: config.navigation,
            jackett: config.jackett.as_ref().map(|j| SanitizedJackettConfig {
                url: j.url.clone(),
                api_key_configured: !j.api_key.is_empty(),
                timeout_secs: j.timeout_secs,
                indexers: j.indexers.clone(),
            }),
            qbittorrent: SanitizedQBittorrentConfig {
                url: config.qbittorrent.url.clone(),
                username: config.qbittorrent.username.clone(),
                password_configured: !config.qbittorrent.password.is_empty(),
                timeout_secs: config.qbittorrent.timeout_secs,
            },
            dashboard: config.dashboard.clone(),
            imdb: config.imdb.clone(),
        }
    }
}
