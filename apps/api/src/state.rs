use std::sync::Arc;

use crate::export::ExportRegistry;
use crate::report::ReportRenderer;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub exports: ExportRegistry,
    /// Pluggable report renderer. Default: PdfRenderer on US letter.
    pub renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    pub fn new(renderer: Arc<dyn ReportRenderer>) -> Self {
        Self {
            sessions: SessionStore::new(),
            exports: ExportRegistry::new(),
            renderer,
        }
    }
}
