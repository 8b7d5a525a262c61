//! In-memory inverted index
//!
//! Keys are kept per category in sorted maps so exact lookups are map gets
//! and case-sensitive prefix lookups are range scans. Other rules fall back
//! to scanning the category with a compiled matcher.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use roaring::RoaringBitmap;
use tracing::debug;

use super::document_table::DocumentTable;
use super::session::SessionRegistry;
use super::types::{Category, DocNo, IndexEntry, SessionId};
use super::{Index, QueryKey};
use crate::config::IndexSettings;
use crate::models::SourceDocument;
use crate::query::MatchMode;
use crate::Result;

/// Sorted key -> postings map of one category
pub type KeyPostings = BTreeMap<Vec<u8>, RoaringBitmap>;

#[derive(Debug, Default)]
struct MemoryState {
    keys: HashMap<Category, KeyPostings>,
    documents: DocumentTable,
}

/// Mutable in-memory index
pub struct MemoryIndex {
    settings: IndexSettings,
    state: RwLock<MemoryState>,
    sessions: SessionRegistry,
}

impl MemoryIndex {
    pub fn new(settings: IndexSettings) -> Self {
        Self {
            settings,
            state: RwLock::new(MemoryState::default()),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    /// Register `key` under `category` for a document
    pub fn add_key(&self, category: Category, key: &[u8], document: &str) -> DocNo {
        let mut state = self.state.write();
        let docno = state.documents.get_or_add(document);
        state
            .keys
            .entry(category)
            .or_default()
            .entry(key.to_vec())
            .or_default()
            .insert(docno.as_u32());
        docno
    }

    /// Register every declaration of a source document
    ///
    /// The document is known to the index even when it declares nothing.
    pub fn index_document(&self, document: &SourceDocument) -> DocNo {
        let mut state = self.state.write();
        let docno = state.documents.get_or_add(&document.path);
        for declaration in &document.declarations {
            state
                .keys
                .entry(declaration.category())
                .or_default()
                .entry(declaration.index_key())
                .or_default()
                .insert(docno.as_u32());
        }
        debug!(
            document = %document.path,
            declarations = document.declarations.len(),
            "indexed document"
        );
        docno
    }

    pub fn document_count(&self) -> usize {
        self.state.read().documents.len()
    }

    /// Number of distinct keys stored under a category
    pub fn key_count(&self, category: Category) -> usize {
        self.state
            .read()
            .keys
            .get(&category)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions.open_count()
    }

    /// Copy out document names and per-category postings (sorted by category)
    pub fn export(&self) -> (Vec<String>, Vec<(Category, KeyPostings)>) {
        let state = self.state.read();
        let mut categories: Vec<(Category, KeyPostings)> = state
            .keys
            .iter()
            .map(|(category, postings)| (*category, postings.clone()))
            .collect();
        categories.sort_by_key(|(category, _)| *category);
        (state.documents.names().to_vec(), categories)
    }
}

impl Index for MemoryIndex {
    fn container_path(&self) -> &str {
        &self.settings.container_path
    }

    fn separator(&self) -> char {
        self.settings.separator
    }

    fn start_query(&self) -> Result<SessionId> {
        Ok(self.sessions.open())
    }

    fn stop_query(&self, session: SessionId) {
        self.sessions.close(session);
    }

    fn query_entries(&self, session: SessionId, key: &QueryKey) -> Result<Vec<IndexEntry>> {
        self.sessions.ensure_open(session)?;
        let matcher = key.matcher()?;
        let state = self.state.read();

        let mut entries = Vec::new();
        for &category in &key.categories {
            let Some(postings) = state.keys.get(&category) else {
                continue;
            };

            match (&key.key, key.rule.mode, key.rule.case_sensitive) {
                (Some(word), MatchMode::Exact, true) => {
                    if let Some(docs) = postings.get(word) {
                        entries.push(IndexEntry::new(category, word.clone(), docs.clone()));
                    }
                }
                (Some(prefix), MatchMode::Prefix, true) => {
                    for (word, docs) in postings.range(prefix.clone()..) {
                        if !word.starts_with(prefix) {
                            break;
                        }
                        entries.push(IndexEntry::new(category, word.clone(), docs.clone()));
                    }
                }
                _ => {
                    for (word, docs) in postings {
                        if matcher.matches_bytes(word) {
                            entries.push(IndexEntry::new(category, word.clone(), docs.clone()));
                        }
                    }
                }
            }
        }
        Ok(entries)
    }

    fn document_names(&self, session: SessionId, documents: &RoaringBitmap) -> Result<Vec<String>> {
        self.sessions.ensure_open(session)?;
        self.state.read().documents.resolve(documents)
    }
}
