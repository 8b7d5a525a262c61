//! Core types shared by index implementations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense document number within one index (0..document_count)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocNo(pub u32);

impl DocNo {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of one open query session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of indexed fact a key describes
///
/// Every key is stored under exactly one category; queries name the
/// categories they look in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    TypeDecl,
    MethodDecl,
    FieldDecl,
    Reference,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::TypeDecl,
        Category::MethodDecl,
        Category::FieldDecl,
        Category::Reference,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TypeDecl => "typeDecl",
            Category::MethodDecl => "methodDecl",
            Category::FieldDecl => "fieldDecl",
            Category::Reference => "ref",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw index entry as returned by an index implementation
///
/// Holds the stored key ("word") and the numbers of every document that
/// registered it. Callers normally see it wrapped in an `EntryResult`.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexEntry {
    pub category: Category,
    pub word: Vec<u8>,
    pub documents: roaring::RoaringBitmap,
}

impl IndexEntry {
    pub fn new(category: Category, word: Vec<u8>, documents: roaring::RoaringBitmap) -> Self {
        Self {
            category,
            word,
            documents,
        }
    }
}
