//! Conjunction of patterns by document intersection
//!
//! Each child is queried in turn against one session. Documents of
//! confirmed entries form the child's candidate set, which is intersected
//! with the survivors of the previous children. The search stops as soon
//! as a child has no entries or the intersection is empty, so later
//! children are never queried.
//!
//! Survivors are reported after the session closes, with no decoded key:
//! a conjunction match is confirmed by several decoders, not one.

use tracing::{debug, trace};

use crate::error::SearchError;
use crate::index::{Index, QuerySession};
use crate::query::context::QueryContext;
use crate::query::cursor::QueryCursor;
use crate::query::pattern::{report_document, PatternRef, SearchPattern};
use crate::query::types::{DocumentNameSet, QueryStats};
use crate::Result;

use std::sync::Arc;

/// Non-empty ordered conjunction of patterns
#[derive(Clone, Debug)]
pub struct AndPattern {
    children: Vec<PatternRef>,
}

impl AndPattern {
    /// Start a conjunction with its first child
    pub fn of<P: SearchPattern + 'static>(first: P) -> Self {
        Self {
            children: vec![Arc::new(first)],
        }
    }

    /// Append a child; children are queried in insertion order
    pub fn and<P: SearchPattern + 'static>(mut self, next: P) -> Self {
        self.children.push(Arc::new(next));
        self
    }

    /// Append an already shared child
    pub fn and_ref(mut self, next: PatternRef) -> Self {
        self.children.push(next);
        self
    }

    /// Build from a list; an empty list is rejected
    pub fn try_from_patterns(children: Vec<PatternRef>) -> Result<Self> {
        if children.is_empty() {
            return Err(SearchError::InvalidPattern(
                "conjunction needs at least one pattern".to_string(),
            ));
        }
        Ok(Self { children })
    }

    pub fn children(&self) -> &[PatternRef] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// New cursor positioned before the first child
    pub fn queries(&self) -> QueryCursor<'_> {
        QueryCursor::new(&self.children)
    }

    /// Report every document of `index` matched by all children
    pub fn find_index_matches(
        &self,
        index: &dyn Index,
        ctx: &mut QueryContext<'_>,
    ) -> Result<QueryStats> {
        ctx.check_cancelled()?;

        let mut stats = QueryStats::default();
        let Some(survivors) = self.intersect(index, ctx, &mut stats)? else {
            return Ok(stats);
        };

        for name in &survivors {
            if report_document(name, index.container_path(), index.separator(), None, ctx)? {
                stats.documents_reported += 1;
            }
        }
        debug!(
            children = self.children.len(),
            matches = survivors.len(),
            reported = stats.documents_reported,
            "conjunction complete"
        );
        Ok(stats)
    }

    /// Run the intersection loop inside one session
    ///
    /// Returns `None` when some step came up empty.
    fn intersect(
        &self,
        index: &dyn Index,
        ctx: &QueryContext<'_>,
        stats: &mut QueryStats,
    ) -> Result<Option<DocumentNameSet>> {
        let mut cursor = self.queries();
        cursor.reset_query();

        let session = QuerySession::open(index)?;
        let mut intersection: Option<DocumentNameSet> = None;

        while let Some(pattern) = cursor.current_pattern() {
            ctx.check_cancelled()?;

            stats.index_queries += 1;
            let entries = pattern.query_in(&session)?;
            if entries.is_empty() {
                debug!(
                    step = cursor.position(),
                    pattern = pattern.pattern_kind(),
                    "no entries, conjunction cannot match"
                );
                stats.short_circuited = true;
                return Ok(None);
            }
            stats.entries_scanned += entries.len() as u64;

            let mut decoded = pattern.blank_decoded();
            let mut candidates = DocumentNameSet::new();
            for entry in &entries {
                ctx.check_cancelled()?;
                pattern.decode_index_key(entry.category(), entry.word(), &mut decoded)?;
                if !pattern.matches_decoded_key(&decoded) {
                    stats.entries_rejected += 1;
                    trace!(entry = ?entry, "entry rejected by decoded match");
                    continue;
                }
                for name in entry.document_names()? {
                    let survives = intersection
                        .as_ref()
                        .map_or(true, |previous| previous.contains(&name));
                    if survives {
                        candidates.insert(name);
                    }
                }
            }

            if candidates.is_empty() {
                debug!(
                    step = cursor.position(),
                    pattern = pattern.pattern_kind(),
                    "intersection empty, conjunction cannot match"
                );
                stats.short_circuited = true;
                return Ok(None);
            }
            trace!(step = cursor.position(), survivors = candidates.len(), "intersection narrowed");
            intersection = Some(candidates);
            cursor.advance();
        }

        Ok(intersection)
    }
}
