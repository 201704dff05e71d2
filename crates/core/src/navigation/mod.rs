//! Result navigation.
//!
//! A conversation moves between a season list, a quality list, a paged
//! episode list and a flat paged list. [`NavigationState::apply`] is the
//! pure transition function and [`resolve_view`] turns a state plus a
//! result set into something a front-end can render.

mod pagination;
mod state;
mod transition;
mod view;

pub use pagination::{paginate, PageInfo};
pub use state::{Mode, NavigationState};
pub use transition::Transition;
pub use view::{resolve_view, Row, ViewDescriptor, ViewKind};
