use thiserror::Error;

use crate::index::{Category, SessionId};

/// Main error type for codeseek operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search cancelled")]
    Cancelled,

    #[error("Index storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Corrupt index snapshot: {0}")]
    Corrupt(String),

    #[error("Requestor error: {0}")]
    Requestor(String),

    #[error("Query session {0} is not open")]
    SessionClosed(SessionId),

    #[error("Cannot decode {category} key: {reason}")]
    KeyDecode { category: Category, reason: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for codeseek operations
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Whether the failure came from the index rather than from the caller
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            SearchError::Storage(_)
                | SearchError::Io(_)
                | SearchError::Serialization(_)
                | SearchError::Corrupt(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }

    /// Stable label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Cancelled => "cancelled",
            SearchError::Storage(_)
            | SearchError::Io(_)
            | SearchError::Serialization(_)
            | SearchError::Corrupt(_) => "storage",
            SearchError::Requestor(_) => "requestor",
            SearchError::SessionClosed(_) => "session",
            SearchError::KeyDecode { .. } => "decode",
            SearchError::InvalidPattern(_) => "pattern",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::SessionClosed(SessionId(7));
        assert_eq!(err.to_string(), "Query session 7 is not open");

        let err = SearchError::KeyDecode {
            category: Category::MethodDecl,
            reason: "missing arity".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot decode methodDecl key: missing arity");
    }

    #[test]
    fn test_error_kinds() {
        assert!(SearchError::Storage("disk".to_string()).is_storage_error());
        assert!(SearchError::Corrupt("crc".to_string()).is_storage_error());
        assert!(!SearchError::Cancelled.is_storage_error());
        assert!(SearchError::Cancelled.is_cancelled());
        assert_eq!(SearchError::Requestor("x".to_string()).kind(), "requestor");
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(SearchError::from(io).kind(), "storage");
    }
}
