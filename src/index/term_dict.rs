//! Key dictionary using FST (Finite State Transducer)
//!
//! Maps encoded keys to ordinals into a postings array. FST gives
//! O(|key|) exact lookups and ordered range scans for prefixes.

use fst::{IntoStreamer, Map, MapBuilder, Streamer};

use crate::error::SearchError;
use crate::Result;

/// Immutable key dictionary backed by FST
pub struct TermDictionary {
    fst: Map<Vec<u8>>,
}

impl TermDictionary {
    /// Create a dictionary from serialized FST bytes
    pub fn new(fst_data: Vec<u8>) -> Result<Self> {
        let fst = Map::new(fst_data)
            .map_err(|e| SearchError::Corrupt(format!("Invalid key dictionary: {}", e)))?;
        Ok(Self { fst })
    }

    /// Look up a key and return its ordinal
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.fst.get(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.fst.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// All keys starting with `prefix`, in key order
    pub fn prefix_search(&self, prefix: &[u8]) -> Vec<(Vec<u8>, u64)> {
        let mut stream = self.fst.range().ge(prefix).into_stream();
        let mut results = Vec::new();
        while let Some((key, ordinal)) = stream.next() {
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), ordinal));
        }
        results
    }

    /// Every key in order
    pub fn iter_terms(&self) -> Vec<(Vec<u8>, u64)> {
        let mut results = Vec::with_capacity(self.len());
        let mut stream = self.fst.stream();
        while let Some((key, ordinal)) = stream.next() {
            results.push((key.to_vec(), ordinal));
        }
        results
    }

    /// Raw FST bytes (for serialization)
    pub fn fst_bytes(&self) -> &[u8] {
        self.fst.as_fst().as_bytes()
    }
}

/// Builder for key dictionaries
#[derive(Default)]
pub struct TermDictionaryBuilder {
    keys: Vec<(Vec<u8>, u64)>,
}

impl TermDictionaryBuilder {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Add a key with its postings ordinal; order does not matter
    pub fn add(&mut self, key: Vec<u8>, ordinal: u64) {
        self.keys.push((key, ordinal));
    }

    pub fn build(mut self) -> Result<TermDictionary> {
        // FST requires sorted, unique input
        self.keys.sort_by(|a, b| a.0.cmp(&b.0));
        self.keys.dedup_by(|a, b| a.0 == b.0);

        let mut builder = MapBuilder::memory();
        for (key, ordinal) in &self.keys {
            builder
                .insert(key, *ordinal)
                .map_err(|e| SearchError::Storage(format!("Key dictionary build failed: {}", e)))?;
        }
        let fst_data = builder
            .into_inner()
            .map_err(|e| SearchError::Storage(format!("Key dictionary build failed: {}", e)))?;

        TermDictionary::new(fst_data)
    }
}
