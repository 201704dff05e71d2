//! Mock download client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::results::Locator;
use crate::torrent_client::{
    AddResult, TorrentClient, TorrentClientError, TransferFile, TransferInfo,
};

/// Mock implementation of the TorrentClient trait.
///
/// Keeps transfers in memory, records every add and delete, and can be
/// told to fail the next call.
pub struct MockTorrentClient {
    transfers: Arc<RwLock<Vec<TransferInfo>>>,
    files: Arc<RwLock<HashMap<String, Vec<TransferFile>>>>,
    added: Arc<RwLock<Vec<Locator>>>,
    deleted: Arc<RwLock<Vec<(String, bool)>>>,
    next_error: Arc<RwLock<Option<TorrentClientError>>>,
}

impl Default for MockTorrentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTorrentClient {
    pub fn new() -> Self {
        Self {
            transfers: Arc::new(RwLock::new(Vec::new())),
            files: Arc::new(RwLock::new(HashMap::new())),
            added: Arc::new(RwLock::new(Vec::new())),
            deleted: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn add_transfer(&self, transfer: TransferInfo) {
        self.transfers.write().await.push(transfer);
    }

    pub async fn set_files(&self, hash: &str, files: Vec<TransferFile>) {
        self.files.write().await.insert(hash.to_string(), files);
    }

    /// Make the next call fail with the given error.
    pub async fn set_next_error(&self, error: TorrentClientError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn added_locators(&self) -> Vec<Locator> {
        self.added.read().await.clone()
    }

    /// Deleted hashes with their `delete_files` flag.
    pub async fn deleted(&self) -> Vec<(String, bool)> {
        self.deleted.read().await.clone()
    }

    async fn take_error(&self) -> Result<(), TorrentClientError> {
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TorrentClient for MockTorrentClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn add(&self, locator: &Locator) -> Result<AddResult, TorrentClientError> {
        self.take_error().await?;
        self.added.write().await.push(locator.clone());
        Ok(AddResult::default())
    }

    async fn list_transfers(&self) -> Result<Vec<TransferInfo>, TorrentClientError> {
        self.take_error().await?;
        Ok(self.transfers.read().await.clone())
    }

    async fn get_transfer(&self, hash: &str) -> Result<TransferInfo, TorrentClientError> {
        self.take_error().await?;
        self.transfers
            .read()
            .await
            .iter()
            .find(|t| t.hash.eq_ignore_ascii_case(hash))
            .cloned()
            .ok_or_else(|| TorrentClientError::TorrentNotFound(hash.to_string()))
    }

    async fn list_files(&self, hash: &str) -> Result<Vec<TransferFile>, TorrentClientError> {
        self.take_error().await?;
        self.files
            .read()
            .await
            .get(hash)
            .cloned()
            .ok_or_else(|| TorrentClientError::TorrentNotFound(hash.to_string()))
    }

    async fn delete(&self, hash: &str, delete_files: bool) -> Result<(), TorrentClientError> {
        self.take_error().await?;
        let mut transfers = self.transfers.write().await;
        let before = transfers.len();
        transfers.retain(|t| !t.hash.eq_ignore_ascii_case(hash));
        if transfers.len() == before {
            return Err(TorrentClientError::TorrentNotFound(hash.to_string()));
        }
        self.deleted
            .write()
            .await
            .push((hash.to_string(), delete_files));
        Ok(())
    }
}
