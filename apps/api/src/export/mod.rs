// Export jobs: on-demand PDF generation that ends in a ready or failed state.
// A failed job stays failed; the client retries by starting a new export.

pub mod handlers;
pub mod jobs;

pub use jobs::ExportRegistry;
