//! Match requestors
//!
//! A requestor is the sink for confirmed, in-scope matches. It runs
//! synchronously inside the search, so a slow requestor delays the
//! release of the index session.

use serde::{Deserialize, Serialize};

use crate::encoding::DecodedKey;
use crate::query::types::DocumentNameSet;
use crate::Result;

/// Identity of the source that produced an index
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParticipant {
    pub name: String,
}

impl SearchParticipant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One confirmed match
///
/// `decoded` is `None` for matches derived from a conjunction. Otherwise
/// it borrows the search's reusable decode buffer: clone it to keep it.
#[derive(Clone, Copy, Debug)]
pub struct IndexMatch<'a> {
    pub document_name: &'a str,
    pub container_path: &'a str,
    pub separator: char,
    pub decoded: Option<&'a DecodedKey>,
    pub participant: &'a SearchParticipant,
}

impl IndexMatch<'_> {
    /// Fully-qualified document path
    pub fn document_path(&self) -> String {
        if self.container_path.is_empty() {
            return self.document_name.to_string();
        }
        let mut path =
            String::with_capacity(self.container_path.len() + 1 + self.document_name.len());
        path.push_str(self.container_path);
        path.push(self.separator);
        path.push_str(self.document_name);
        path
    }
}

/// Receiver of search matches
///
/// Return `Ok(true)` to keep receiving, `Ok(false)` to stop the search
/// (it ends with `SearchError::Cancelled`), or an error to abort it.
/// Matches reported before a failure stay reported.
pub trait IndexQueryRequestor {
    fn accept_index_match(&mut self, hit: &IndexMatch<'_>) -> Result<bool>;
}

impl<F> IndexQueryRequestor for F
where
    F: FnMut(&IndexMatch<'_>) -> Result<bool>,
{
    fn accept_index_match(&mut self, hit: &IndexMatch<'_>) -> Result<bool> {
        self(hit)
    }
}

/// Collects distinct document paths
#[derive(Debug, Default)]
pub struct CollectingRequestor {
    paths: DocumentNameSet,
}

impl CollectingRequestor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &DocumentNameSet {
        &self.paths
    }

    pub fn into_paths(self) -> DocumentNameSet {
        self.paths
    }
}

impl IndexQueryRequestor for CollectingRequestor {
    fn accept_index_match(&mut self, hit: &IndexMatch<'_>) -> Result<bool> {
        self.paths.insert(hit.document_path());
        Ok(true)
    }
}
