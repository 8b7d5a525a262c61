use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::index::Category;

/// One indexable fact extracted from a source file
///
/// Produced by a language model outside this crate; the index only needs
/// the category and the encoded key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Declaration {
    Type {
        name: String,
        #[serde(default)]
        namespace: String,
        #[serde(default)]
        modifiers: u32,
    },
    Method {
        selector: String,
        arity: u32,
    },
    Field {
        name: String,
    },
    Reference {
        name: String,
    },
}

impl Declaration {
    pub fn type_decl(name: impl Into<String>, namespace: impl Into<String>, modifiers: u32) -> Self {
        Declaration::Type {
            name: name.into(),
            namespace: namespace.into(),
            modifiers,
        }
    }

    pub fn method(selector: impl Into<String>, arity: u32) -> Self {
        Declaration::Method {
            selector: selector.into(),
            arity,
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Declaration::Field { name: name.into() }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Declaration::Reference { name: name.into() }
    }

    pub fn category(&self) -> Category {
        match self {
            Declaration::Type { .. } => Category::TypeDecl,
            Declaration::Method { .. } => Category::MethodDecl,
            Declaration::Field { .. } => Category::FieldDecl,
            Declaration::Reference { .. } => Category::Reference,
        }
    }

    /// Encoded index key for this declaration
    pub fn index_key(&self) -> Vec<u8> {
        match self {
            Declaration::Type {
                name,
                namespace,
                modifiers,
            } => encoding::type_decl_key(name, namespace, *modifiers),
            Declaration::Method { selector, arity } => encoding::method_decl_key(selector, *arity),
            Declaration::Field { name } => encoding::field_decl_key(name),
            Declaration::Reference { name } => encoding::reference_key(name),
        }
    }
}

/// A source file and the declarations found in it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document name, relative to the index container
    pub path: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, declarations: Vec<Declaration>) -> Self {
        Self {
            path: path.into(),
            declarations,
        }
    }
}
