// ROI Model: pure functions from an input snapshot to savings, growth and impact.
// Nothing in here holds state; sessions own the mutable field text.

pub mod display;
pub mod format;
pub mod growth;
pub mod handlers;
pub mod inputs;
pub mod savings;
pub mod summary;

// Re-export the public API consumed by sessions, exports and the report.
pub use display::Calculation;
pub use inputs::InputSnapshot;
