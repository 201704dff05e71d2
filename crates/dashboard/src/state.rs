use std::path::{Path, PathBuf};
use std::sync::Arc;

use nightleech_core::{Config, SanitizedConfig, TorrentClient};

use crate::error::DashboardError;

/// Shared dashboard state.
pub struct DashboardState {
    config: Config,
    client: Arc<dyn TorrentClient>,
    /// Canonical form of `dashboard.files_dir`.
    files_root: PathBuf,
}

impl DashboardState {
    /// Build the state, creating the download directory if needed.
    pub async fn new(config: Config, client: Arc<dyn TorrentClient>) -> Result<Self, DashboardError> {
        tokio::fs::create_dir_all(&config.dashboard.files_dir).await?;
        let files_root = tokio::fs::canonicalize(&config.dashboard.files_dir).await?;

        Ok(Self {
            config,
            client,
            files_root,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &dyn TorrentClient {
        self.client.as_ref()
    }

    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
