//! Types for download client operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::results::Locator;

/// Errors that can occur during download client operations.
#[derive(Debug, Error)]
pub enum TorrentClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Torrent not found: {0}")]
    TorrentNotFound(String),

    #[error("Torrent rejected by client: {0}")]
    Rejected(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TorrentClientError {
    /// The client could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            TorrentClientError::ConnectionFailed(_) | TorrentClientError::Timeout
        )
    }
}

/// State of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentState {
    /// Downloading from peers.
    Downloading,
    /// Seeding to peers.
    Seeding,
    /// Download or upload is paused.
    Paused,
    /// Checking file integrity.
    Checking,
    /// Queued for download.
    Queued,
    /// Stalled (no peers).
    Stalled,
    /// Error state.
    Error,
    /// Unknown state.
    Unknown,
}

impl TorrentState {
    /// Returns the string representation for API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            TorrentState::Downloading => "downloading",
            TorrentState::Seeding => "seeding",
            TorrentState::Paused => "paused",
            TorrentState::Checking => "checking",
            TorrentState::Queued => "queued",
            TorrentState::Stalled => "stalled",
            TorrentState::Error => "error",
            TorrentState::Unknown => "unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TorrentState::Downloading => "⬇️",
            TorrentState::Seeding => "⬆️",
            TorrentState::Paused => "⏸️",
            TorrentState::Checking => "🔍",
            TorrentState::Queued => "⏳",
            TorrentState::Stalled => "⚠️",
            TorrentState::Error => "❌",
            TorrentState::Unknown => "❔",
        }
    }
}

/// A transfer known to the download client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferInfo {
    /// Info hash (lowercase hex).
    pub hash: String,
    pub name: String,
    pub state: TorrentState,
    /// Download progress (0.0 - 1.0).
    pub progress: f64,
    pub size_bytes: u64,
    pub downloaded_bytes: u64,
    /// Bytes/second.
    pub download_speed: u64,
    /// Bytes/second.
    pub upload_speed: u64,
    pub seeders: u32,
    pub leechers: u32,
    /// ETA in seconds (None if unknown or complete).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl TransferInfo {
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

/// A file inside a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFile {
    /// Path relative to the transfer's save path.
    pub name: String,
    pub size_bytes: u64,
    pub progress: f64,
}

/// Counters over a list of transfers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferStats {
    pub total: usize,
    pub downloading: usize,
    pub seeding: usize,
    pub paused: usize,
    pub total_size_bytes: u64,
    pub download_speed: u64,
    pub upload_speed: u64,
}

impl From<&[TransferInfo]> for TransferStats {
    fn from(transfers: &[TransferInfo]) -> Self {
        transfers
            .iter()
            .fold(TransferStats::default(), |mut stats, t| {
                stats.total += 1;
                match t.state {
                    TorrentState::Downloading => stats.downloading += 1,
                    TorrentState::Seeding => stats.seeding += 1,
                    TorrentState::Paused => stats.paused += 1,
                    _ => {}
                }
                stats.total_size_bytes += t.size_bytes;
                stats.download_speed += t.download_speed;
                stats.upload_speed += t.upload_speed;
                stats
            })
    }
}

/// Result of adding a torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResult {
    /// Known up front only for magnets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Trait for download client backends.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Add a torrent by magnet URI or download URL.
    async fn add(&self, locator: &Locator) -> Result<AddResult, TorrentClientError>;

    async fn list_transfers(&self) -> Result<Vec<TransferInfo>, TorrentClientError>;

    async fn get_transfer(&self, hash: &str) -> Result<TransferInfo, TorrentClientError>;

    async fn list_files(&self, hash: &str) -> Result<Vec<TransferFile>, TorrentClientError>;

    /// Remove a transfer, optionally deleting its files.
    async fn delete(&self, hash: &str, delete_files: bool) -> Result<(), TorrentClientError>;
}
