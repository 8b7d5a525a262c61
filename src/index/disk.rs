//! Read-only index loaded from a snapshot file
//!
//! Snapshot layout:
//! - 8-byte magic `CSEEKIX1`
//! - u32 payload length (little endian)
//! - u32 crc32 of payload
//! - bincode payload: settings, document names, and per category an FST
//!   key dictionary plus serialized roaring postings indexed by ordinal

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::document_table::DocumentTable;
use super::memory::MemoryIndex;
use super::session::SessionRegistry;
use super::term_dict::{TermDictionary, TermDictionaryBuilder};
use super::types::{Category, IndexEntry, SessionId};
use super::{Index, QueryKey};
use crate::config::IndexSettings;
use crate::error::SearchError;
use crate::query::MatchMode;
use crate::Result;

const MAGIC: &[u8; 8] = b"CSEEKIX1";
const HEADER_LEN: usize = MAGIC.len() + 8;

#[derive(Serialize, Deserialize)]
struct SnapshotPayload {
    settings: IndexSettings,
    documents: Vec<String>,
    categories: Vec<CategorySnapshot>,
}

#[derive(Serialize, Deserialize)]
struct CategorySnapshot {
    category: Category,
    fst: Vec<u8>,
    postings: Vec<Vec<u8>>,
}

/// Write the current contents of a memory index to `path`
pub fn write_snapshot(index: &MemoryIndex, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (documents, exported) = index.export();

    let mut categories = Vec::with_capacity(exported.len());
    for (category, keys) in exported {
        let mut builder = TermDictionaryBuilder::with_capacity(keys.len());
        let mut postings = Vec::with_capacity(keys.len());
        for (ordinal, (key, docs)) in keys.into_iter().enumerate() {
            builder.add(key, ordinal as u64);
            let mut bytes = Vec::with_capacity(docs.serialized_size());
            docs.serialize_into(&mut bytes)?;
            postings.push(bytes);
        }
        categories.push(CategorySnapshot {
            category,
            fst: builder.build()?.fst_bytes().to_vec(),
            postings,
        });
    }

    let payload = bincode::serialize(&SnapshotPayload {
        settings: index.settings().clone(),
        documents,
        categories,
    })?;
    let len = u32::try_from(payload.len())
        .map_err(|_| SearchError::Storage("Snapshot payload exceeds 4 GiB".to_string()))?;

    let mut hasher = Hasher::new();
    hasher.update(&payload);
    let crc32 = hasher.finalize();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(MAGIC)?;
    file.write_all(&len.to_le_bytes())?;
    file.write_all(&crc32.to_le_bytes())?;
    file.write_all(&payload)?;
    file.flush()?;

    info!(path = %path.display(), bytes = payload.len(), "wrote index snapshot");
    Ok(())
}

struct DiskCategory {
    dict: TermDictionary,
    postings: Vec<RoaringBitmap>,
}

/// Immutable index backed by a snapshot file
pub struct DiskIndex {
    path: PathBuf,
    settings: IndexSettings,
    documents: DocumentTable,
    categories: HashMap<Category, DiskCategory>,
    sessions: SessionRegistry,
}

impl DiskIndex {
    /// Open and validate a snapshot written by `write_snapshot`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path)?;

        if data.len() < HEADER_LEN || &data[..MAGIC.len()] != MAGIC {
            return Err(SearchError::Corrupt(format!(
                "{} is not an index snapshot",
                path.display()
            )));
        }
        let len = read_u32(&data[8..12]) as usize;
        let stored_crc = read_u32(&data[12..16]);
        let payload = &data[HEADER_LEN..];
        if payload.len() != len {
            return Err(SearchError::Corrupt(format!(
                "Snapshot length mismatch: expected {}, found {}",
                len,
                payload.len()
            )));
        }

        let mut hasher = Hasher::new();
        hasher.update(payload);
        if hasher.finalize() != stored_crc {
            return Err(SearchError::Corrupt(
                "Snapshot checksum mismatch".to_string(),
            ));
        }

        let snapshot: SnapshotPayload = bincode::deserialize(payload)?;
        let mut categories = HashMap::with_capacity(snapshot.categories.len());
        for category in snapshot.categories {
            let dict = TermDictionary::new(category.fst)?;
            let postings = category
                .postings
                .iter()
                .map(|bytes| RoaringBitmap::deserialize_from(bytes.as_slice()))
                .collect::<std::io::Result<Vec<_>>>()
                .map_err(|e| SearchError::Corrupt(format!("Invalid postings: {}", e)))?;
            if postings.len() != dict.len() {
                return Err(SearchError::Corrupt(format!(
                    "{} has {} keys but {} posting lists",
                    category.category,
                    dict.len(),
                    postings.len()
                )));
            }
            categories.insert(category.category, DiskCategory { dict, postings });
        }

        info!(
            path = %path.display(),
            documents = snapshot.documents.len(),
            "opened index snapshot"
        );

        Ok(Self {
            path,
            settings: snapshot.settings,
            documents: DocumentTable::from_names(snapshot.documents),
            categories,
            sessions: SessionRegistry::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions.open_count()
    }
}

impl Index for DiskIndex {
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

        let mut entries = Vec::new();
        for &category in &key.categories {
            let Some(disk) = self.categories.get(&category) else {
                continue;
            };

            let hits: Vec<(Vec<u8>, u64)> = match (&key.key, key.rule.mode, key.rule.case_sensitive) {
                (Some(word), MatchMode::Exact, true) => disk
                    .dict
                    .get(word)
                    .map(|ordinal| vec![(word.clone(), ordinal)])
                    .unwrap_or_default(),
                (Some(prefix), MatchMode::Prefix, true) => disk.dict.prefix_search(prefix),
                _ => disk
                    .dict
                    .iter_terms()
                    .into_iter()
                    .filter(|(word, _)| matcher.matches_bytes(word))
                    .collect(),
            };

            for (word, ordinal) in hits {
                let docs = disk.postings.get(ordinal as usize).ok_or_else(|| {
                    SearchError::Corrupt(format!("Key ordinal {} out of range", ordinal))
                })?;
                entries.push(IndexEntry::new(category, word, docs.clone()));
            }
        }
        Ok(entries)
    }

    fn document_names(&self, session: SessionId, documents: &RoaringBitmap) -> Result<Vec<String>> {
        self.sessions.ensure_open(session)?;
        self.documents.resolve(documents)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}
