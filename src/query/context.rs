//! Per-search context
//!
//! Bundles everything a search reports through: the requestor, the
//! participant identity, the scope filter and an optional progress
//! monitor.

use crate::error::SearchError;
use crate::query::progress::{check_cancelled, ProgressMonitor};
use crate::query::requestor::{IndexMatch, IndexQueryRequestor, SearchParticipant};
use crate::query::scope::SearchScope;
use crate::Result;

pub struct QueryContext<'a> {
    requestor: &'a mut dyn IndexQueryRequestor,
    participant: &'a SearchParticipant,
    scope: &'a dyn SearchScope,
    monitor: Option<&'a dyn ProgressMonitor>,
}

impl<'a> QueryContext<'a> {
    pub fn new(
        requestor: &'a mut dyn IndexQueryRequestor,
        participant: &'a SearchParticipant,
        scope: &'a dyn SearchScope,
    ) -> Self {
        Self {
            requestor,
            participant,
            scope,
            monitor: None,
        }
    }

    /// Poll `monitor` for cancellation during the search
    pub fn with_monitor(mut self, monitor: &'a dyn ProgressMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn participant(&self) -> &'a SearchParticipant {
        self.participant
    }

    pub fn scope(&self) -> &'a dyn SearchScope {
        self.scope
    }

    pub fn is_canceled(&self) -> bool {
        self.monitor.map_or(false, |m| m.is_canceled())
    }

    /// Fail with `Cancelled` if cancellation was requested
    pub fn check_cancelled(&self) -> Result<()> {
        check_cancelled(self.monitor)
    }

    /// Hand a match to the requestor if it is in scope
    ///
    /// Returns whether the requestor saw it. A requestor that declines
    /// further matches turns into `Cancelled`.
    pub fn report(&mut self, hit: &IndexMatch<'_>) -> Result<bool> {
        self.check_cancelled()?;
        if !self.scope.encloses(&hit.document_path()) {
            return Ok(false);
        }
        if self.requestor.accept_index_match(hit)? {
            Ok(true)
        } else {
            Err(SearchError::Cancelled)
        }
    }
}

impl std::fmt::Debug for QueryContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext")
            .field("participant", &self.participant)
            .field("scope", &self.scope)
            .field("canceled", &self.is_canceled())
            .finish()
    }
}
