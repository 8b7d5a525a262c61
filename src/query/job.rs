//! Search across several indexes

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::index::Index;
use crate::metrics::SearchMetrics;
use crate::query::context::QueryContext;
use crate::query::search_query::SearchQuery;
use crate::query::types::QueryStats;
use crate::Result;

/// Runs one query over a list of indexes, in order
///
/// Indexes whose container lies outside the context's scope are skipped
/// without opening a session. Cancellation is checked before each index.
#[derive(Clone, Debug)]
pub struct PatternSearchJob {
    query: SearchQuery,
    metrics: Option<Arc<SearchMetrics>>,
}

impl PatternSearchJob {
    pub fn new(query: impl Into<SearchQuery>) -> Self {
        Self {
            query: query.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<SearchMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn run(&self, indexes: &[Arc<dyn Index>], ctx: &mut QueryContext<'_>) -> Result<QueryStats> {
        let start = Instant::now();
        let result = self.search_indexes(indexes, ctx);
        let elapsed = start.elapsed();

        match &result {
            Ok(stats) => {
                info!(
                    query = self.query.query_type(),
                    indexes = indexes.len(),
                    index_queries = stats.index_queries,
                    reported = stats.documents_reported,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "search complete"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_search(self.query.query_type(), stats, elapsed.as_secs_f64());
                }
            }
            Err(e) => {
                warn!(query = self.query.query_type(), error = %e, "search failed");
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(e);
                }
            }
        }
        result
    }

    fn search_indexes(
        &self,
        indexes: &[Arc<dyn Index>],
        ctx: &mut QueryContext<'_>,
    ) -> Result<QueryStats> {
        let mut stats = QueryStats::default();
        for index in indexes {
            ctx.check_cancelled()?;
            if !ctx.scope().includes_container(index.container_path()) {
                debug!(container = index.container_path(), "index outside scope, skipped");
                continue;
            }
            stats.merge(&self.query.find_index_matches(index.as_ref(), ctx)?);
        }
        Ok(stats)
    }
}
