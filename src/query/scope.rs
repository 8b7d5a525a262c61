//! Search scopes
//!
//! A scope decides which fully-qualified document paths may be reported.
//! The query engine treats it as a black box and only consults it when a
//! match is about to reach the requestor (and, at job level, to skip
//! whole indexes).

use std::fmt::Debug;

/// Filter over document paths
pub trait SearchScope: Send + Sync + Debug {
    /// Whether a document (container path + separator + name) is in scope
    fn encloses(&self, document_path: &str) -> bool;

    /// Whether an index container can hold any in-scope document
    fn includes_container(&self, _container_path: &str) -> bool {
        true
    }
}

/// Everything is in scope
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkspaceScope;

impl SearchScope for WorkspaceScope {
    fn encloses(&self, _document_path: &str) -> bool {
        true
    }
}

/// Documents under one of several root paths
#[derive(Clone, Debug)]
pub struct PathScope {
    roots: Vec<String>,
    separator: char,
}

impl PathScope {
    pub fn new(roots: Vec<String>, separator: char) -> Self {
        let roots = roots
            .into_iter()
            .map(|root| {
                let trimmed = root.trim_end_matches(separator);
                if trimmed.is_empty() {
                    root
                } else {
                    trimmed.to_string()
                }
            })
            .collect();
        Self { roots, separator }
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    fn is_under(&self, path: &str, root: &str) -> bool {
        match path.strip_prefix(root) {
            Some("") => true,
            Some(rest) => rest.starts_with(self.separator) || root.ends_with(self.separator),
            None => false,
        }
    }
}

impl SearchScope for PathScope {
    fn encloses(&self, document_path: &str) -> bool {
        self.roots
            .iter()
            .any(|root| self.is_under(document_path, root))
    }

    fn includes_container(&self, container_path: &str) -> bool {
        // A root inside the container still selects some of its documents
        self.roots.iter().any(|root| {
            self.is_under(container_path, root) || self.is_under(root, container_path)
        })
    }
}
