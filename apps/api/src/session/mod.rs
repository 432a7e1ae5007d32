// Calculator sessions: the mutable field text a presentation layer edits.
// Held in memory only and gone on restart.

pub mod handlers;
pub mod state;
pub mod store;

pub use store::SessionStore;
