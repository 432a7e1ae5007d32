pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::roi::handlers as roi;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless calculation
        .route("/api/v1/roi/defaults", get(roi::handle_defaults))
        .route("/api/v1/roi/calculate", post(roi::handle_calculate))
        // Calculator sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session)
                .patch(session::handle_edit_session)
                .delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handle_reset_session),
        )
        // Exports
        .route(
            "/api/v1/sessions/:id/exports",
            post(export::handle_start_export),
        )
        .route(
            "/api/v1/exports/:job_id/status",
            get(export::handle_export_status),
        )
        .route("/api/v1/exports/:job_id", get(export::handle_download_export))
        .with_state(state)
}
