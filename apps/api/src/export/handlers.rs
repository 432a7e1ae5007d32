//! Axum route handlers for report exports.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::jobs::ExportJobView;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/exports
///
/// Snapshots the session's current inputs and starts rendering in the
/// background. Poll the status route, then download.
pub async fn handle_start_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ExportJobView>), AppError> {
    let snapshot = state.sessions.get(session_id).await?;
    let (view, _handle) = state
        .exports
        .start(state.renderer.clone(), session_id, snapshot.inputs)
        .await;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// GET /api/v1/exports/:job_id/status
pub async fn handle_export_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ExportJobView>, AppError> {
    Ok(Json(state.exports.view(job_id).await?))
}

/// GET /api/v1/exports/:job_id
///
/// Streams the finished document as an attachment. 409 while the job is
/// pending or after it failed.
pub async fn handle_download_export(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let download = state.exports.download(job_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", download.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, download.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}
