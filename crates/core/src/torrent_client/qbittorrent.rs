//! qBittorrent download client implementation (WebUI API v2).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{multipart, Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::QBittorrentConfig;
use crate::results::Locator;

use super::{
    AddResult, TorrentClient, TorrentClientError, TorrentState, TransferFile, TransferInfo,
};

/// qBittorrent reports this ETA when it has no estimate.
const QB_ETA_UNKNOWN: i64 = 8_640_000;

/// qBittorrent client implementation.
///
/// The SID cookie lives in the reqwest cookie store and is shared by every
/// caller. Logging in again with the same credentials yields an equivalent
/// session, so concurrent refreshes are harmless.
pub struct QBittorrentClient {
    client: Client,
    config: QBittorrentConfig,
    authenticated: RwLock<bool>,
}

impl QBittorrentClient {
    /// Create a new qBittorrent client.
    pub fn new(config: QBittorrentConfig) -> Result<Self, TorrentClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| {
                TorrentClientError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            authenticated: RwLock::new(false),
        })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url(), endpoint)
    }

    /// Login and let the cookie jar keep the session.
    async fn login(&self) -> Result<(), TorrentClientError> {
        let params = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .client
            .post(self.url("/api/v2/auth/login"))
            .form(&params)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() && body.contains("Ok.") {
            debug!("qBittorrent login successful");
            *self.authenticated.write().await = true;
            Ok(())
        } else if body.contains("Fails.") || status == StatusCode::FORBIDDEN {
            Err(TorrentClientError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ))
        } else {
            Err(TorrentClientError::AuthenticationFailed(format!(
                "Unexpected response: {}",
                body.chars().take(100).collect::<String>()
            )))
        }
    }

    /// Ensure we have a session, logging in if needed.
    async fn ensure_authenticated(&self) -> Result<(), TorrentClientError> {
        if *self.authenticated.read().await {
            return Ok(());
        }
        self.login().await
    }

    /// Send an authenticated request.
    ///
    /// A 403 means the session expired: log in once and retry the request
    /// exactly once. A second 403 is an authentication failure.
    async fn send<F>(&self, build: F) -> Result<String, TorrentClientError>
    where
        F: Fn() -> RequestBuilder,
    {
        self.ensure_authenticated().await?;

        let mut response = build().send().await.map_err(map_send_error)?;

        if response.status() == StatusCode::FORBIDDEN {
            warn!("qBittorrent session expired, re-authenticating");
            *self.authenticated.write().await = false;
            self.login().await?;
            response = build().send().await.map_err(map_send_error)?;

            if response.status() == StatusCode::FORBIDDEN {
                *self.authenticated.write().await = false;
                return Err(TorrentClientError::AuthenticationFailed(
                    "Session rejected after re-login".to_string(),
                ));
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TorrentClientError::ApiError(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| TorrentClientError::ApiError(e.to_string()))
    }

    async fn get(&self, endpoint: &str) -> Result<String, TorrentClientError> {
        let url = self.url(endpoint);
        self.send(|| self.client.get(&url)).await
    }

    async fn post_form(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, TorrentClientError> {
        let url = self.url(endpoint);
        self.send(|| self.client.post(&url).form(params)).await
    }

    fn add_form(&self, locator: &Locator) -> multipart::Form {
        let mut form = multipart::Form::new().text("urls", locator.as_str().to_string());
        if let Some(path) = &self.config.download_path {
            form = form.text("savepath", path.clone());
        }
        form
    }
}

fn map_send_error(e: reqwest::Error) -> TorrentClientError {
    if e.is_timeout() {
        TorrentClientError::Timeout
    } else if e.is_connect() {
        TorrentClientError::ConnectionFailed(e.to_string())
    } else {
        TorrentClientError::ApiError(e.to_string())
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, TorrentClientError> {
    serde_json::from_str(body)
        .map_err(|e| TorrentClientError::ApiError(format!("Failed to parse response: {}", e)))
}

/// qBittorrent torrent info response.
#[derive(Debug, Deserialize)]
struct QBTorrentInfo {
    hash: String,
    name: String,
    state: String,
    progress: f64,
    size: i64,
    downloaded: i64,
    dlspeed: i64,
    upspeed: i64,
    num_seeds: i64,
    num_leechs: i64,
    eta: i64,
    #[serde(default)]
    added_on: i64,
    #[serde(default)]
    save_path: String,
    #[serde(default)]
    category: String,
}

impl QBTorrentInfo {
    fn into_transfer_info(self) -> TransferInfo {
        TransferInfo {
            hash: self.hash.to_lowercase(),
            name: self.name,
            state: parse_qb_state(&self.state),
            progress: self.progress,
            size_bytes: self.size.max(0) as u64,
            downloaded_bytes: self.downloaded.max(0) as u64,
            download_speed: self.dlspeed.max(0) as u64,
            upload_speed: self.upspeed.max(0) as u64,
            seeders: self.num_seeds.max(0) as u32,
            leechers: self.num_leechs.max(0) as u32,
            eta_secs: (self.eta > 0 && self.eta < QB_ETA_UNKNOWN).then_some(self.eta as u64),
            category: (!self.category.is_empty()).then_some(self.category),
            save_path: (!self.save_path.is_empty()).then_some(self.save_path),
            added_at: timestamp_to_datetime(self.added_on),
        }
    }
}

/// qBittorrent file entry response.
#[derive(Debug, Deserialize)]
struct QBFileInfo {
    name: String,
    size: i64,
    #[serde(default)]
    progress: f64,
}

/// Parse qBittorrent state string to TorrentState.
fn parse_qb_state(state: &str) -> TorrentState {
    match state {
        "downloading" | "forcedDL" | "metaDL" | "forcedMetaDL" | "allocating" => {
            TorrentState::Downloading
        }
        "uploading" | "forcedUP" => TorrentState::Seeding,
        "pausedDL" | "pausedUP" | "stoppedDL" | "stoppedUP" => TorrentState::Paused,
        "checkingDL" | "checkingUP" | "checkingResumeData" | "moving" => TorrentState::Checking,
        "queuedDL" | "queuedUP" => TorrentState::Queued,
        "stalledDL" | "stalledUP" => TorrentState::Stalled,
        "error" | "missingFiles" => TorrentState::Error,
        _ => TorrentState::Unknown,
    }
}

/// Convert Unix timestamp to DateTime<Utc>.
fn timestamp_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 0 {
        Utc.timestamp_opt(ts, 0).single()
    } else {
        None
    }
}

/// Extract info hash from a magnet URI.
fn extract_hash_from_magnet(magnet: &str) -> Option<String> {
    let (_, query) = magnet.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("xt=urn:btih:"))
        .map(str::to_lowercase)
}

#[async_trait]
impl TorrentClient for QBittorrentClient {
    fn name(&self) -> &str {
        "qbittorrent"
    }

    async fn add(&self, locator: &Locator) -> Result<AddResult, TorrentClientError> {
        let url = self.url("/api/v2/torrents/add");
        let body = self
            .send(|| self.client.post(&url).multipart(self.add_form(locator)))
            .await?;

        if body.contains("Fails.") {
            return Err(TorrentClientError::Rejected(body.trim().to_string()));
        }

        let hash = match locator {
            Locator::Magnet(uri) => extract_hash_from_magnet(uri),
            // Name and hash are unknown until the .torrent is fetched
            Locator::Url(_) => None,
        };
        info!(hash = ?hash, magnet = locator.is_magnet(), "Torrent added");

        Ok(AddResult { hash })
    }

    async fn list_transfers(&self) -> Result<Vec<TransferInfo>, TorrentClientError> {
        let body = self.get("/api/v2/torrents/info").await?;
        let torrents: Vec<QBTorrentInfo> = parse_json(&body)?;

        Ok(torrents
            .into_iter()
            .map(QBTorrentInfo::into_transfer_info)
            .collect())
    }

    async fn get_transfer(&self, hash: &str) -> Result<TransferInfo, TorrentClientError> {
        let endpoint = format!(
            "/api/v2/torrents/info?hashes={}",
            urlencoding::encode(&hash.to_lowercase())
        );
        let body = self.get(&endpoint).await?;
        let torrents: Vec<QBTorrentInfo> = parse_json(&body)?;

        torrents
            .into_iter()
            .next()
            .map(QBTorrentInfo::into_transfer_info)
            .ok_or_else(|| TorrentClientError::TorrentNotFound(hash.to_string()))
    }

    async fn list_files(&self, hash: &str) -> Result<Vec<TransferFile>, TorrentClientError> {
        let endpoint = format!(
            "/api/v2/torrents/files?hash={}",
            urlencoding::encode(&hash.to_lowercase())
        );
        // qBittorrent answers 404 for unknown hashes
        let body = match self.get(&endpoint).await {
            Err(TorrentClientError::ApiError(msg)) if msg.contains("404") => {
                return Err(TorrentClientError::TorrentNotFound(hash.to_string()))
            }
            other => other?,
        };
        let files: Vec<QBFileInfo> = parse_json(&body)?;

        Ok(files
            .into_iter()
            .map(|f| TransferFile {
                name: f.name,
                size_bytes: f.size.max(0) as u64,
                progress: f.progress,
            })
            .collect())
    }

    async fn delete(&self, hash: &str, delete_files: bool) -> Result<(), TorrentClientError> {
        let hash_lower = hash.to_lowercase();
        let delete_str = if delete_files { "true" } else { "false" };

        self.post_form(
            "/api/v2/torrents/delete",
            &[("hashes", &hash_lower), ("deleteFiles", delete_str)],
        )
        .await?;

        info!(hash = %hash_lower, delete_files = delete_files, "Torrent deleted");
        Ok(())
    }
}
