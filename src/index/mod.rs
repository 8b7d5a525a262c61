//! Inverted index abstraction
//!
//! An index maps encoded keys ("words") to the set of documents that
//! registered them. Reads happen inside a query session:
//!
//! - `QuerySession::open` calls `Index::start_query`, and dropping the
//!   session calls `Index::stop_query` exactly once, on every exit path
//! - `EntryResult` borrows the session, so entries cannot outlive it
//!
//! # Implementations
//!
//! - `MemoryIndex`: mutable in-memory index built from declarations
//! - `DiskIndex`: read-only index loaded from a checksummed snapshot file

mod disk;
mod document_table;
mod memory;
mod session;
mod term_dict;
mod types;

pub use disk::*;
pub use document_table::*;
pub use memory::*;
pub use session::*;
pub use term_dict::*;
pub use types::*;

use crate::query::{MatchRule, NameMatcher};
use crate::Result;
use roaring::RoaringBitmap;
use tracing::trace;

/// Coarse, encoded form of a query
///
/// `key = None` matches every key in the listed categories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryKey {
    pub categories: Vec<Category>,
    pub key: Option<Vec<u8>>,
    pub rule: MatchRule,
}

impl QueryKey {
    pub fn new(category: Category, key: Option<Vec<u8>>, rule: MatchRule) -> Self {
        Self {
            categories: vec![category],
            key,
            rule,
        }
    }

    /// Query every key of one category
    pub fn all(category: Category) -> Self {
        Self::new(category, None, MatchRule::exact())
    }

    /// Look in several categories at once
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Compile the key-level matcher for scanning implementations
    pub fn matcher(&self) -> Result<NameMatcher> {
        NameMatcher::for_bytes(self.key.as_deref(), self.rule)
    }
}

/// Read access to an inverted index
///
/// Implementations own their internal locking; the query engine never
/// locks anything itself. Overlapping sessions must be independent.
pub trait Index: Send + Sync {
    /// Path of the container (project, archive, ...) the index describes
    fn container_path(&self) -> &str;

    /// Separator placed between the container path and a document name
    fn separator(&self) -> char;

    /// Open a query session
    fn start_query(&self) -> Result<SessionId>;

    /// Close a query session opened by `start_query`
    fn stop_query(&self, session: SessionId);

    /// Return every entry whose key satisfies the coarse query
    ///
    /// Ordering is unspecified; no match is an empty vector, not an error.
    fn query_entries(&self, session: SessionId, key: &QueryKey) -> Result<Vec<IndexEntry>>;

    /// Resolve document numbers to document names
    fn document_names(&self, session: SessionId, documents: &RoaringBitmap) -> Result<Vec<String>>;
}

/// Scoped query session on one index
///
/// Stops the query when dropped.
pub struct QuerySession<'i> {
    index: &'i dyn Index,
    id: SessionId,
}

impl<'i> QuerySession<'i> {
    /// Start a query on the index
    pub fn open(index: &'i dyn Index) -> Result<Self> {
        let id = index.start_query()?;
        trace!(session = %id, container = index.container_path(), "query session opened");
        Ok(Self { index, id })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn index(&self) -> &'i dyn Index {
        self.index
    }

    /// Query the index; the entries are only usable while this session lives
    pub fn query(&self, key: &QueryKey) -> Result<Vec<EntryResult<'_>>> {
        let entries = self.index.query_entries(self.id, key)?;
        Ok(entries
            .into_iter()
            .map(|entry| EntryResult {
                entry,
                index: self.index,
                session: self.id,
            })
            .collect())
    }
}

impl Drop for QuerySession<'_> {
    fn drop(&mut self) {
        self.index.stop_query(self.id);
        trace!(session = %self.id, "query session closed");
    }
}

/// One key and its documents, valid for the lifetime of its session
pub struct EntryResult<'s> {
    entry: IndexEntry,
    index: &'s dyn Index,
    session: SessionId,
}

impl EntryResult<'_> {
    pub fn category(&self) -> Category {
        self.entry.category
    }

    /// Encoded key as stored in the index
    pub fn word(&self) -> &[u8] {
        &self.entry.word
    }

    pub fn document_count(&self) -> u64 {
        self.entry.documents.len()
    }

    /// Resolve the entry's documents to owned names
    pub fn document_names(&self) -> Result<Vec<String>> {
        self.index.document_names(self.session, &self.entry.documents)
    }
}

impl std::fmt::Debug for EntryResult<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryResult")
            .field("category", &self.entry.category)
            .field("word", &String::from_utf8_lossy(&self.entry.word))
            .field("documents", &self.entry.documents.len())
            .field("session", &self.session)
            .finish()
    }
}
