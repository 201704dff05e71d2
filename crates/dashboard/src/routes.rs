use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::DashboardState;

pub fn create_router(state: Arc<DashboardState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/torrents", get(handlers::list_transfers));

    Router::new()
        .route("/", get(handlers::transfers_page))
        .route("/files", get(handlers::files_page))
        .route("/download/{*path}", get(handlers::download))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
