//! Instrumented index wrapper for testing
//!
//! Wraps another index and captures every call made through the `Index`
//! boundary so tests can check query counts and session discipline.

use parking_lot::Mutex;
use roaring::RoaringBitmap;

use crate::error::SearchError;
use crate::index::{Index, IndexEntry, QueryKey, SessionId};
use crate::Result;

/// Counts of calls made through the index boundary
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexCallCounts {
    pub start_query: usize,
    pub stop_query: usize,
    pub query_entries: usize,
}

#[derive(Debug, Default)]
struct CallLog {
    counts: IndexCallCounts,
    keys: Vec<QueryKey>,
    stopped: Vec<SessionId>,
}

/// Wrapper around an index that records calls for testing
pub struct InstrumentedIndex<I> {
    inner: I,
    log: Mutex<CallLog>,
    fail_after: Mutex<Option<usize>>,
}

impl<I: Index> InstrumentedIndex<I> {
    /// Create a new instrumented wrapper around an index
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            log: Mutex::new(CallLog::default()),
            fail_after: Mutex::new(None),
        }
    }

    /// Make every `query_entries` call after the first `n` fail with a
    /// storage error
    pub fn fail_queries_after(&self, n: usize) {
        *self.fail_after.lock() = Some(n);
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn counts(&self) -> IndexCallCounts {
        self.log.lock().counts.clone()
    }

    /// Number of `query_entries` calls so far
    pub fn queries_issued(&self) -> usize {
        self.log.lock().counts.query_entries
    }

    /// Keys passed to `query_entries`, in call order
    pub fn queried_keys(&self) -> Vec<QueryKey> {
        self.log.lock().keys.clone()
    }

    /// Whether every started session was stopped exactly once
    pub fn sessions_balanced(&self) -> bool {
        let log = self.log.lock();
        let mut stopped = log.stopped.clone();
        stopped.sort();
        stopped.dedup();
        log.counts.start_query == log.counts.stop_query && stopped.len() == log.stopped.len()
    }
}

impl<I: Index> Index for InstrumentedIndex<I> {
    fn container_path(&self) -> &str {
        self.inner.container_path()
    }

    fn separator(&self) -> char {
        self.inner.separator()
    }

    fn start_query(&self) -> Result<SessionId> {
        let id = self.inner.start_query()?;
        self.log.lock().counts.start_query += 1;
        Ok(id)
    }

    fn stop_query(&self, session: SessionId) {
        {
            let mut log = self.log.lock();
            log.counts.stop_query += 1;
            log.stopped.push(session);
        }
        self.inner.stop_query(session);
    }

    fn query_entries(&self, session: SessionId, key: &QueryKey) -> Result<Vec<IndexEntry>> {
        let issued = {
            let mut log = self.log.lock();
            log.counts.query_entries += 1;
            log.keys.push(key.clone());
            log.counts.query_entries
        };
        if let Some(limit) = *self.fail_after.lock() {
            if issued > limit {
                return Err(SearchError::Storage(format!(
                    "injected failure on query {}",
                    issued
                )));
            }
        }
        self.inner.query_entries(session, key)
    }

    fn document_names(&self, session: SessionId, documents: &RoaringBitmap) -> Result<Vec<String>> {
        self.inner.document_names(session, documents)
    }
}
