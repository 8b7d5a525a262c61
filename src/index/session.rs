//! Query-session bookkeeping shared by index implementations

use crate::error::SearchError;
use crate::index::types::SessionId;
use crate::Result;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Tracks which query sessions are open on one index
///
/// Sessions are independent: any number may overlap, and closing one
/// never affects another.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    open: Mutex<HashSet<SessionId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session and return its id
    pub fn open(&self) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.open.lock().insert(id);
        id
    }

    /// Close a session; returns false if it was not open
    pub fn close(&self, id: SessionId) -> bool {
        let closed = self.open.lock().remove(&id);
        if !closed {
            warn!("stop_query for unknown session {}", id);
        }
        closed
    }

    /// Fail with `SessionClosed` unless the session is open
    pub fn ensure_open(&self, id: SessionId) -> Result<()> {
        if self.open.lock().contains(&id) {
            Ok(())
        } else {
            Err(SearchError::SessionClosed(id))
        }
    }

    /// Number of currently open sessions
    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }
}
