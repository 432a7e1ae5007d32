// Report Renderer: the three-page exportable summary.
// Document building copies display strings verbatim; layout is pure and CPU-bound;
// PDF serialization runs inside tokio::task::spawn_blocking.

pub mod document;
pub mod layout;
pub mod metrics;
pub mod renderer;

// Re-export the public API consumed by exports and startup.
pub use document::build_report;
pub use layout::default_page_setup;
pub use renderer::{PdfRenderer, ReportRenderer};
