//! Core types for the query system

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a name (or an encoded key) is compared against a pattern
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Whole string must be equal
    #[default]
    Exact,
    /// String must start with the pattern
    Prefix,
    /// `*` matches any run of characters, `?` exactly one
    Pattern,
    /// Upper-case letters of the pattern select camel-case humps (`NPE` -> `NullPointerException`)
    #[serde(rename = "camelcase")]
    CamelCase,
}

/// Match mode plus case sensitivity
///
/// Exact, prefix and camel-case folding is ASCII-only. Wildcard patterns
/// fold with the regex engine's Unicode rules. Coarse key lookups and fine
/// name checks compile the same matcher, so both levels fold alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRule {
    pub mode: MatchMode,
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}

impl Default for MatchRule {
    fn default() -> Self {
        Self::exact()
    }
}

impl MatchRule {
    pub fn new(mode: MatchMode, case_sensitive: bool) -> Self {
        Self {
            mode,
            case_sensitive,
        }
    }

    pub fn exact() -> Self {
        Self::new(MatchMode::Exact, true)
    }

    pub fn prefix() -> Self {
        Self::new(MatchMode::Prefix, true)
    }

    pub fn pattern() -> Self {
        Self::new(MatchMode::Pattern, true)
    }

    pub fn camel_case() -> Self {
        Self::new(MatchMode::CamelCase, true)
    }

    /// Same mode, case-insensitive
    pub fn ignore_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Same case sensitivity, different mode
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Set of document names collected during one query pass
///
/// Names compare by exact string equality. Iteration order is sorted so
/// reporting is deterministic.
pub type DocumentNameSet = BTreeSet<String>;

/// Query execution statistics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStats {
    /// Number of `query_entries` calls issued against indexes
    pub index_queries: u64,
    /// Entries returned by coarse lookups
    pub entries_scanned: u64,
    /// Entries dropped by the fine decode-and-confirm step
    pub entries_rejected: u64,
    /// Matches handed to the requestor (after scope filtering)
    pub documents_reported: u64,
    /// Whether a conjunction stopped early on an empty intermediate result
    pub short_circuited: bool,
}

impl QueryStats {
    /// Fold another run's statistics into this one
    pub fn merge(&mut self, other: &QueryStats) {
        self.index_queries += other.index_queries;
        self.entries_scanned += other.entries_scanned;
        self.entries_rejected += other.entries_rejected;
        self.documents_reported += other.documents_reported;
        self.short_circuited |= other.short_circuited;
    }
}
