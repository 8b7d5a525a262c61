//! Search pattern contract and single-pattern search
//!
//! A pattern splits its predicate in two levels:
//!
//! 1. a coarse `QueryKey` the index can answer cheaply (exact key, key
//!    prefix, wildcard over keys)
//! 2. a fine check on the decoded key (`matches_decoded_key`) for what the
//!    encoded key alone cannot express, such as an exact arity
//!
//! Index keys are deliberately less selective than full patterns, so every
//! coarse hit goes through the fine check before any of its documents count.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::encoding::DecodedKey;
use crate::index::{Category, EntryResult, Index, QueryKey, QuerySession};
use crate::query::context::QueryContext;
use crate::query::requestor::IndexMatch;
use crate::query::types::QueryStats;
use crate::Result;

/// Shared pattern handle
pub type PatternRef = Arc<dyn SearchPattern>;

pub trait SearchPattern: Send + Sync + Debug {
    /// Short name for logging and metrics
    fn pattern_kind(&self) -> &'static str;

    /// Coarse key to look up in the index
    fn query_key(&self) -> QueryKey;

    /// Fresh decode target, reused by the caller across many keys
    fn blank_decoded(&self) -> DecodedKey;

    /// Decode an index key into `decoded`, overwriting all of its state
    fn decode_index_key(
        &self,
        category: Category,
        key: &[u8],
        decoded: &mut DecodedKey,
    ) -> Result<()> {
        decoded.decode(category, key)
    }

    /// Fine check on a decoded key
    fn matches_decoded_key(&self, decoded: &DecodedKey) -> bool;

    /// Run the coarse lookup inside an open session
    fn query_in<'s>(&self, session: &'s QuerySession<'_>) -> Result<Vec<EntryResult<'s>>> {
        session.query(&self.query_key())
    }

    /// Report one confirmed match through the context
    ///
    /// Returns whether the match was in scope and reached the requestor.
    fn accept_match(
        &self,
        document_name: &str,
        container_path: &str,
        separator: char,
        decoded: Option<&DecodedKey>,
        ctx: &mut QueryContext<'_>,
    ) -> Result<bool> {
        report_document(document_name, container_path, separator, decoded, ctx)
    }
}

/// Hand one document to the context's scope and requestor
///
/// Every match reaches the requestor through here, from `accept_match` or
/// from a conjunction reporting its survivors.
pub(crate) fn report_document(
    document_name: &str,
    container_path: &str,
    separator: char,
    decoded: Option<&DecodedKey>,
    ctx: &mut QueryContext<'_>,
) -> Result<bool> {
    let participant = ctx.participant();
    ctx.report(&IndexMatch {
        document_name,
        container_path,
        separator,
        decoded,
        participant,
    })
}

/// Run one pattern against one index and report every confirmed document
///
/// Matches are reported with their decoded key while the session is open.
pub fn find_pattern_matches(
    pattern: &dyn SearchPattern,
    index: &dyn Index,
    ctx: &mut QueryContext<'_>,
) -> Result<QueryStats> {
    ctx.check_cancelled()?;

    let mut stats = QueryStats::default();
    let session = QuerySession::open(index)?;

    stats.index_queries += 1;
    let entries = pattern.query_in(&session)?;
    stats.entries_scanned += entries.len() as u64;
    debug!(
        pattern = pattern.pattern_kind(),
        entries = entries.len(),
        container = index.container_path(),
        "pattern lookup"
    );
    if entries.is_empty() {
        return Ok(stats);
    }

    let mut decoded = pattern.blank_decoded();
    for entry in &entries {
        ctx.check_cancelled()?;
        pattern.decode_index_key(entry.category(), entry.word(), &mut decoded)?;
        if !pattern.matches_decoded_key(&decoded) {
            stats.entries_rejected += 1;
            trace!(entry = ?entry, "entry rejected by decoded match");
            continue;
        }

        for name in entry.document_names()? {
            if pattern.accept_match(
                &name,
                index.container_path(),
                index.separator(),
                Some(&decoded),
                ctx,
            )? {
                stats.documents_reported += 1;
            }
        }
    }

    Ok(stats)
}
