use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::IndexSettings;
use crate::error::SearchError;
use crate::index::MemoryIndex;
use crate::models::SourceDocument;
use crate::Result;

/// JSON description of an index: settings plus every source document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    #[serde(default)]
    pub settings: IndexSettings,
    #[serde(default)]
    pub documents: Vec<SourceDocument>,
}

impl IndexManifest {
    /// Read a manifest from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        serde_json::from_slice(&data).map_err(|e| {
            SearchError::Storage(format!("Invalid manifest {}: {}", path.display(), e))
        })
    }

    /// Build an in-memory index from the manifest
    pub fn build_index(&self) -> MemoryIndex {
        let index = MemoryIndex::new(self.settings.clone());
        for document in &self.documents {
            index.index_document(document);
        }
        index
    }
}
