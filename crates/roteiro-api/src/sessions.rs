//! Live operator sessions.
//!
//! Navigation state is session-only and never persisted: a session is
//! created when the operator opens a product and destroyed when they return
//! to the product list. The store is a plain in-memory map behind the
//! state's `Arc`.

use std::collections::HashMap;
use std::sync::RwLock;

use roteiro_navigation::{NavigationSession, TabulationCue};
use roteiro_render::Placeholders;
use uuid::Uuid;

/// One operator's live state: traversal, placeholder values and the
/// tabulation pulse cue.
#[derive(Debug)]
pub struct OperatorSession {
    /// The traversal state machine.
    pub nav: NavigationSession,
    /// Session-local tabulation pulse.
    pub cue: TabulationCue,
    /// Runtime placeholder values for rendering.
    pub placeholders: Placeholders,
    /// Operator's accessibility base size in pixels.
    pub base_px: f32,
}

/// In-memory session map.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, OperatorSession>>,
}

impl SessionStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under a fresh handle.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, session: OperatorSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().unwrap().insert(id, session);
        id
    }

    /// Run `f` against a session, if it exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut OperatorSession) -> R) -> Option<R> {
        self.sessions.write().unwrap().get_mut(&id).map(f)
    }

    /// Destroy a session. Returns whether it existed.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().unwrap().remove(&id).is_some()
    }
}
