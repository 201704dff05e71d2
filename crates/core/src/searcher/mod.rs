//! Torrent search abstraction.
//!
//! A `Searcher` fans a query out to the configured indexers of a
//! meta-search proxy and returns the raw records of every indexer that
//! answered.

mod directory;
mod jackett;
mod types;

pub use directory::{IndexerDirectory, IndexerEntry};
pub use jackett::JackettSearcher;
pub use types::*;
