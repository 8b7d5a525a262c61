pub mod config;
pub mod encoding;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod query;
pub mod testing;

pub use config::{IndexSettings, SearchSettings};
pub use encoding::DecodedKey;
pub use error::{Result, SearchError};
pub use index::{
    write_snapshot, Category, DiskIndex, EntryResult, Index, MemoryIndex, QueryKey, QuerySession,
};
pub use metrics::SearchMetrics;
pub use models::*;
pub use query::{
    AndPattern, FieldPattern, MatchMode, MatchRule, MethodPattern, OrPattern, PatternSearchJob,
    QueryContext, QueryStats, ReferencePattern, SearchPattern, SearchQuery,
    TypeDeclarationPattern,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
