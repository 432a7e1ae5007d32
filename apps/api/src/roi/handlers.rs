//! Axum route handlers for stateless calculation.

use axum::{extract::rejection::JsonRejection, Json};
use tracing::debug;

use crate::errors::AppError;
use crate::roi::{Calculation, InputSnapshot};

/// GET /api/v1/roi/defaults
///
/// Returns the seed inputs every new calculator starts from.
pub async fn handle_defaults() -> Json<InputSnapshot> {
    Json(InputSnapshot::default())
}

/// POST /api/v1/roi/calculate
///
/// Computes every derived figure for the posted snapshot. Numeric text that does not
/// parse reads as 0; only a body that is not a snapshot at all is rejected.
pub async fn handle_calculate(
    payload: Result<Json<InputSnapshot>, JsonRejection>,
) -> Result<Json<Calculation>, AppError> {
    let Json(snapshot) = payload?;
    debug!(tasks = snapshot.tasks.len(), "Calculating ROI for posted snapshot");
    Ok(Json(Calculation::from_snapshot(snapshot)))
}
