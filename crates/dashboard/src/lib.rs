//! Web dashboard: transfer monitor, file browser and file downloads.

pub mod error;
mod files;
mod handlers;
mod routes;
mod state;
mod templates;

pub use error::DashboardError;
pub use routes::create_router;
pub use state::DashboardState;
