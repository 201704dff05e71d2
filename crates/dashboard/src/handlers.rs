use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, warn};

use nightleech_core::format::format_size;
use nightleech_core::{SanitizedConfig, TransferInfo, TransferStats};

use crate::error::DashboardError;
use crate::files;
use crate::state::DashboardState;
use crate::templates::{
    render, ClientErrorTemplate, EntryView, FilesTemplate, TransferView, TransfersTemplate,
};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct TransferListResponse {
    pub transfers: Vec<TransferInfo>,
    pub count: usize,
    pub stats: TransferStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct FilesParams {
    #[serde(default)]
    pub path: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<DashboardState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /api/torrents
pub async fn list_transfers(State(state): State<Arc<DashboardState>>) -> Response {
    match state.client().list_transfers().await {
        Ok(transfers) => Json(TransferListResponse {
            count: transfers.len(),
            stats: TransferStats::from(transfers.as_slice()),
            transfers,
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list transfers");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /
pub async fn transfers_page(
    State(state): State<Arc<DashboardState>>,
) -> Result<Response, DashboardError> {
    let refresh_secs = state.config().dashboard.refresh_secs;

    let transfers = match state.client().list_transfers().await {
        Ok(transfers) => transfers,
        Err(e) => {
            warn!(error = %e, "Download client unavailable");
            let page = render(&ClientErrorTemplate {
                refresh_secs,
                message: e.to_string(),
            })?;
            return Ok((StatusCode::SERVICE_UNAVAILABLE, page).into_response());
        }
    };

    let stats = TransferStats::from(transfers.as_slice());
    let page = render(&TransfersTemplate {
        refresh_secs,
        total_size: format_size(stats.total_size_bytes),
        stats,
        transfers: transfers.iter().map(TransferView::from).collect(),
    })?;
    Ok(page.into_response())
}

/// GET /files?path=
pub async fn files_page(
    State(state): State<Arc<DashboardState>>,
    Query(params): Query<FilesParams>,
) -> Result<Response, DashboardError> {
    let root = state.files_root();
    let dir = files::resolve(root, &params.path).await?;
    if !tokio::fs::metadata(&dir).await?.is_dir() {
        return Err(DashboardError::NotFound(params.path));
    }

    let entries = files::list_dir(root, &dir).await?;
    let relative = files::relative_to(root, &dir);

    let stats = match state.client().list_transfers().await {
        Ok(transfers) => Some(TransferStats::from(transfers.as_slice())),
        Err(e) => {
            debug!(error = %e, "No transfer counters for file browser");
            None
        }
    };

    let page = render(&FilesTemplate {
        crumbs: files::breadcrumbs(&relative),
        stats,
        entries: entries.iter().map(EntryView::from).collect(),
    })?;
    Ok(page.into_response())
}

/// GET /download/{*path}
pub async fn download(
    State(state): State<Arc<DashboardState>>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response, DashboardError> {
    let file = files::resolve(state.files_root(), &path).await?;
    if !tokio::fs::metadata(&file).await?.is_file() {
        return Err(DashboardError::NotFound(path));
    }

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&name)
    ))
    .map_err(|e| DashboardError::Internal(e.to_string()))?;

    debug!(path = %file.display(), "Serving download");

    let response = match ServeFile::new(&file).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    let mut response = response.map(Body::new);
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}
