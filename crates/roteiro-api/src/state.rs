//! Shared application state.

use std::sync::Arc;

use roteiro_core::clock::Clock;
use roteiro_script::ScriptRepository;

use crate::sessions::SessionStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The step repository.
    pub repository: Arc<ScriptRepository>,
    /// Clock used for alerts, reports and the tabulation pulse.
    pub clock: Arc<dyn Clock>,
    /// Live operator sessions.
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(repository: Arc<ScriptRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}
