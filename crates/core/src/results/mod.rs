//! Result aggregation.
//!
//! Raw records from every indexer are classified into [`Item`]s and kept in
//! a [`ResultSet`] that owns the visible ordering: indexer filter, sort and
//! title dedup.

mod item;
mod locator;
mod set;

pub use item::{Item, SortMode};
pub use locator::{Locator, LocatorError};
pub use set::{aggregate, ResultSet};
