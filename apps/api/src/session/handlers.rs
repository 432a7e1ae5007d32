//! Axum route handlers for calculator sessions.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::roi::Calculation;
use crate::session::state::FieldEdit;
use crate::session::store::SessionSnapshot;
use crate::state::AppState;

/// A session's identity plus a fresh calculation over its current inputs.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub calculation: Calculation,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            session_id: snapshot.session_id,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            calculation: Calculation::from_snapshot(snapshot.inputs),
        }
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let snapshot = state.sessions.create().await;
    (StatusCode::CREATED, Json(snapshot.into()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.sessions.get(id).await?;
    Ok(Json(snapshot.into()))
}

/// PATCH /api/v1/sessions/:id
///
/// Applies one field edit and returns the recomputed figures. Editing
/// `rfps_per_year` also rewrites `additional_rfps`.
pub async fn handle_edit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<FieldEdit>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Json(edit) = payload?;
    let snapshot = state.sessions.apply(id, edit).await?;
    Ok(Json(snapshot.into()))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.sessions.reset(id).await?;
    Ok(Json(snapshot.into()))
}

/// DELETE /api/v1/sessions/:id
///
/// Also drops the session's exports, including any still rendering.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    state.exports.remove_for_session(id).await;
    Ok(StatusCode::NO_CONTENT)
}
