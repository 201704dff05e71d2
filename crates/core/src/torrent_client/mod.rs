//! Download client abstraction.
//!
//! This module provides a `TorrentClient` trait for handing torrents to a
//! download client and reading back its transfers.

mod qbittorrent;
mod types;

pub use qbittorrent::QBittorrentClient;
pub use types::*;
