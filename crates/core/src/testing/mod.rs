//! Testing utilities and mock implementations.
//!
//! Mocks of the search and download-client traits let the bot and the
//! dashboard be tested without Jackett or qBittorrent running.
//!
//! # Example
//!
//! ```rust,ignore
//! use nightleech_core::testing::{fixtures, MockSearcher, MockTorrentClient};
//!
//! let searcher = MockSearcher::new();
//! searcher.set_results(vec![fixtures::raw("Show.S01E01.720p", 10)]).await;
//!
//! let client = MockTorrentClient::new();
//! client.add_transfer(fixtures::transfer("abc", "Show", TorrentState::Seeding)).await;
//! ```

mod mock_searcher;
mod mock_torrent_client;

pub use mock_searcher::MockSearcher;
pub use mock_torrent_client::MockTorrentClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::searcher::RawResult;
    use crate::torrent_client::{TorrentState, TransferInfo};

    /// A raw result from the `test` indexer with a magnet locator.
    pub fn raw(title: &str, seeders: u32) -> RawResult {
        RawResult {
            title: title.to_string(),
            locator: format!(
                "magnet:?xt=urn:btih:{:040x}&dn={}",
                title.len(),
                urlencoding::encode(title)
            ),
            size_bytes: 1024 * 1024 * 700,
            seeders,
            indexer: "test".to_string(),
            published_at: None,
        }
    }

    pub fn raw_dated(title: &str, seeders: u32, published_at: DateTime<Utc>) -> RawResult {
        RawResult {
            published_at: Some(published_at),
            ..raw(title, seeders)
        }
    }

    pub fn raw_from(title: &str, seeders: u32, indexer: &str) -> RawResult {
        RawResult {
            indexer: indexer.to_string(),
            ..raw(title, seeders)
        }
    }

    /// A half-done transfer of 1 GB.
    pub fn transfer(hash: &str, name: &str, state: TorrentState) -> TransferInfo {
        TransferInfo {
            hash: hash.to_string(),
            name: name.to_string(),
            state,
            progress: 0.5,
            size_bytes: 1024 * 1024 * 1024,
            downloaded_bytes: 512 * 1024 * 1024,
            download_speed: 0,
            upload_speed: 0,
            seeders: 3,
            leechers: 1,
            eta_secs: None,
            category: None,
            save_path: None,
            added_at: None,
        }
    }
}
