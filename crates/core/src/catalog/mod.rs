//! Title lookups used to suggest search queries.

mod imdb;
mod types;

pub use imdb::{ImdbClient, MIN_QUERY_LEN};
pub use types::*;
