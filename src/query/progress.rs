//! Cooperative cancellation
//!
//! Searches poll a `ProgressMonitor` once per sub-query and once per
//! candidate entry. Nothing is interrupted; the search unwinds with
//! `SearchError::Cancelled` the next time it looks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SearchError;
use crate::Result;

/// Source of a cancellation request
pub trait ProgressMonitor: Send + Sync {
    fn is_canceled(&self) -> bool;
}

impl ProgressMonitor for AtomicBool {
    fn is_canceled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Shareable cancellation flag
///
/// Clones observe the same flag, so one clone can be handed to the
/// search and another kept by whoever decides to cancel.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; later polls observe it
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl ProgressMonitor for CancellationFlag {
    fn is_canceled(&self) -> bool {
        self.0.is_canceled()
    }
}

/// Fail with `Cancelled` if the monitor asks to stop
pub fn check_cancelled(monitor: Option<&dyn ProgressMonitor>) -> Result<()> {
    match monitor {
        Some(monitor) if monitor.is_canceled() => Err(SearchError::Cancelled),
        _ => Ok(()),
    }
}
