//! Pattern matching and boolean query execution
//!
//! A search runs a `SearchQuery` against one or more indexes:
//!
//! - leaf patterns (`TypeDeclarationPattern`, `MethodPattern`,
//!   `FieldPattern`, `ReferencePattern`) look up a coarse key and confirm
//!   each entry on its decoded form
//! - `AndPattern` intersects the documents of its children, stopping at
//!   the first empty step
//! - `OrPattern` runs its children one after another
//!
//! # Example
//!
//! ```rust,ignore
//! let query = AndPattern::of(ReferencePattern::exact("User"))
//!     .and(MethodPattern::new(Some("save"), Some(0), MatchRule::exact())?);
//!
//! let mut requestor = CollectingRequestor::new();
//! let participant = SearchParticipant::new("ruby");
//! let mut ctx = QueryContext::new(&mut requestor, &participant, &WorkspaceScope);
//! PatternSearchJob::new(query).run(&indexes, &mut ctx)?;
//! ```

pub mod context;
pub mod cursor;
pub mod job;
pub mod matching;
pub mod nodes;
pub mod pattern;
pub mod progress;
pub mod requestor;
pub mod scope;
pub mod search_query;
pub mod types;

pub use context::QueryContext;
pub use cursor::QueryCursor;
pub use job::PatternSearchJob;
pub use matching::{camel_case_match, wildcard_to_regex, NameMatcher};
pub use nodes::{
    AndPattern, FieldPattern, MethodPattern, OrPattern, ReferencePattern, TypeDeclarationPattern,
};
pub use pattern::{find_pattern_matches, PatternRef, SearchPattern};
pub use progress::{check_cancelled, CancellationFlag, ProgressMonitor};
pub use requestor::{CollectingRequestor, IndexMatch, IndexQueryRequestor, SearchParticipant};
pub use scope::{PathScope, SearchScope, WorkspaceScope};
pub use search_query::SearchQuery;
pub use types::*;
