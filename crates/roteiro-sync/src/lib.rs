//! Roteiro Sync — write coalescing and change notification.
//!
//! Sits underneath the step repository: mutations enqueue their documents
//! here, a shared quiescence timer collapses bursts into one physical write
//! pass per key, and a longer-debounced update marker plus a typed broadcast
//! tell consumers to re-read.

mod queue;

pub use queue::{DEFAULT_FLUSH_WINDOW, DEFAULT_MARKER_WINDOW, SyncLayer, UPDATE_MARKER_KEY};
