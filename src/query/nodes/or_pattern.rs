//! Union of queries
//!
//! Children run one after another against the same index, each with its
//! own session. A document matched by several children is reported once
//! per child; requestors deduplicate.

use tracing::debug;

use crate::index::Index;
use crate::query::context::QueryContext;
use crate::query::search_query::SearchQuery;
use crate::query::types::QueryStats;
use crate::Result;

#[derive(Clone, Debug, Default)]
pub struct OrPattern {
    children: Vec<SearchQuery>,
}

impl OrPattern {
    pub fn new(children: Vec<SearchQuery>) -> Self {
        Self { children }
    }

    pub fn or(mut self, next: impl Into<SearchQuery>) -> Self {
        self.children.push(next.into());
        self
    }

    pub fn children(&self) -> &[SearchQuery] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Report every document matched by at least one child
    ///
    /// An empty union matches nothing.
    pub fn find_index_matches(
        &self,
        index: &dyn Index,
        ctx: &mut QueryContext<'_>,
    ) -> Result<QueryStats> {
        ctx.check_cancelled()?;

        let mut stats = QueryStats::default();
        for child in &self.children {
            ctx.check_cancelled()?;
            stats.merge(&child.find_index_matches(index, ctx)?);
        }
        debug!(
            children = self.children.len(),
            reported = stats.documents_reported,
            "union complete"
        );
        Ok(stats)
    }
}
