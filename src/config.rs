use serde::{Deserialize, Serialize};

use crate::query::MatchRule;

/// Per-index settings
///
/// `container_path` and `separator` are combined with a document name to
/// build the full document path handed to scopes and requestors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    pub container_path: String,
    pub separator: char,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            container_path: String::new(),
            separator: '/',
        }
    }
}

impl IndexSettings {
    pub fn new(container_path: impl Into<String>) -> Self {
        Self {
            container_path: container_path.into(),
            ..Default::default()
        }
    }

    /// Set the path separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }
}

/// Search defaults applied when a caller does not pick a match rule
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub default_rule: MatchRule,
}

impl SearchSettings {
    pub fn with_default_rule(mut self, rule: MatchRule) -> Self {
        self.default_rule = rule;
        self
    }
}
