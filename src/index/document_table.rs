//! Dense document number mapping
//!
//! Postings store dense `DocNo`s; the table resolves them back to
//! document names when a caller asks for an entry's documents.

use std::collections::HashMap;

use roaring::RoaringBitmap;

use super::types::DocNo;
use crate::error::SearchError;
use crate::Result;

/// Bidirectional docno <-> document name mapping
#[derive(Clone, Debug, Default)]
pub struct DocumentTable {
    /// Dense array: docno -> name
    names: Vec<String>,
    /// Reverse lookup: name -> docno
    by_name: HashMap<String, DocNo>,
}

impl DocumentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from names already in docno order
    pub fn from_names(names: Vec<String>) -> Self {
        let by_name = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), DocNo::new(i as u32)))
            .collect();
        Self { names, by_name }
    }

    /// Return the docno for a name, allocating one if needed
    pub fn get_or_add(&mut self, name: &str) -> DocNo {
        if let Some(&docno) = self.by_name.get(name) {
            return docno;
        }
        let docno = DocNo::new(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), docno);
        docno
    }

    pub fn get(&self, docno: DocNo) -> Option<&str> {
        self.names.get(docno.as_usize()).map(String::as_str)
    }

    pub fn docno(&self, name: &str) -> Option<DocNo> {
        self.by_name.get(name).copied()
    }

    /// Resolve every docno in the bitmap; an unknown docno means the index is inconsistent
    pub fn resolve(&self, documents: &RoaringBitmap) -> Result<Vec<String>> {
        documents
            .iter()
            .map(|n| {
                self.get(DocNo::new(n)).map(str::to_string).ok_or_else(|| {
                    SearchError::Storage(format!("Posting refers to unknown document {}", n))
                })
            })
            .collect()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
