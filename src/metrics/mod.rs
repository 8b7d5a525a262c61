use prometheus::{CounterVec, HistogramOpts, HistogramVec, IntCounter, Opts, Registry};
use std::sync::Arc;

use crate::error::SearchError;
use crate::query::QueryStats;

/// Prometheus metrics for index searches
#[derive(Clone)]
pub struct SearchMetrics {
    // Counters
    pub searches_total: CounterVec,
    pub index_queries: IntCounter,
    pub entries_rejected: IntCounter,
    pub short_circuits: IntCounter,
    pub matches_reported: IntCounter,
    pub search_errors: CounterVec,

    // Histograms
    pub search_latency: HistogramVec,

    // Registry
    registry: Arc<Registry>,
}

impl SearchMetrics {
    /// Create a new SearchMetrics instance
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counters
        let searches_total = CounterVec::new(
            Opts::new("codeseek_searches_total", "Total number of searches by type"),
            &["type"],
        )?;
        registry.register(Box::new(searches_total.clone()))?;

        let index_queries = IntCounter::with_opts(Opts::new(
            "codeseek_index_queries_total",
            "Total number of index lookups issued",
        ))?;
        registry.register(Box::new(index_queries.clone()))?;

        let entries_rejected = IntCounter::with_opts(Opts::new(
            "codeseek_entries_rejected_total",
            "Index entries dropped by decoded-key confirmation",
        ))?;
        registry.register(Box::new(entries_rejected.clone()))?;

        let short_circuits = IntCounter::with_opts(Opts::new(
            "codeseek_short_circuits_total",
            "Searches stopped early on an empty intersection",
        ))?;
        registry.register(Box::new(short_circuits.clone()))?;

        let matches_reported = IntCounter::with_opts(Opts::new(
            "codeseek_matches_reported_total",
            "Matches handed to requestors",
        ))?;
        registry.register(Box::new(matches_reported.clone()))?;

        let search_errors = CounterVec::new(
            Opts::new("codeseek_search_errors_total", "Failed searches by error kind"),
            &["kind"],
        )?;
        registry.register(Box::new(search_errors.clone()))?;

        // Histograms
        let search_latency = HistogramVec::new(
            HistogramOpts::new("codeseek_search_latency_seconds", "Search latency")
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["type"],
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        Ok(Self {
            searches_total,
            index_queries,
            entries_rejected,
            short_circuits,
            matches_reported,
            search_errors,
            search_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record a completed search
    pub fn record_search(&self, search_type: &str, stats: &QueryStats, duration_secs: f64) {
        self.searches_total.with_label_values(&[search_type]).inc();
        self.search_latency
            .with_label_values(&[search_type])
            .observe(duration_secs);
        self.index_queries.inc_by(stats.index_queries);
        self.entries_rejected.inc_by(stats.entries_rejected);
        self.matches_reported.inc_by(stats.documents_reported);
        if stats.short_circuited {
            self.short_circuits.inc();
        }
    }

    /// Record a failed search
    pub fn record_error(&self, error: &SearchError) {
        self.search_errors.with_label_values(&[error.kind()]).inc();
    }
}

impl std::fmt::Debug for SearchMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchMetrics").finish_non_exhaustive()
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
