use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Errors returned by dashboard handlers.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Path outside the download directory")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Template render error: {0}")]
    Template(#[from] askama::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Forbidden => StatusCode::FORBIDDEN,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::Template(_) | DashboardError::Io(_) | DashboardError::Internal(_) => {
                error!(error = %self, "Dashboard request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
