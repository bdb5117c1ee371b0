use prometheus::{Counter, Gauge, Histogram, HistogramOpts, Opts, Registry};
use std::sync::Arc;

use crate::engine::EngineStats;

/// Prometheus metrics for the index and search paths
#[derive(Clone)]
pub struct SearchMetrics {
    // Counters
    pub documents_indexed: Counter,
    pub documents_updated: Counter,
    pub documents_deleted: Counter,
    pub searches_total: Counter,
    pub search_errors: Counter,

    // Gauges, synced from engine counters at scrape time
    pub total_documents: Gauge,
    pub indexed_documents: Gauge,
    pub distinct_tokens: Gauge,
    pub consistency_warnings: Gauge,
    pub cache_hits: Gauge,
    pub cache_misses: Gauge,

    // Histograms
    pub index_latency: Histogram,
    pub search_latency: Histogram,

    // Registry
    registry: Arc<Registry>,
}

impl SearchMetrics {
    /// Create a new SearchMetrics instance
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counters
        let documents_indexed = Counter::with_opts(Opts::new(
            "cuttle_documents_indexed_total",
            "Total number of documents added",
        ))?;
        registry.register(Box::new(documents_indexed.clone()))?;

        let documents_updated = Counter::with_opts(Opts::new(
            "cuttle_documents_updated_total",
            "Total number of documents updated",
        ))?;
        registry.register(Box::new(documents_updated.clone()))?;

        let documents_deleted = Counter::with_opts(Opts::new(
            "cuttle_documents_deleted_total",
            "Total number of documents deleted",
        ))?;
        registry.register(Box::new(documents_deleted.clone()))?;

        let searches_total = Counter::with_opts(Opts::new(
            "cuttle_searches_total",
            "Total number of searches",
        ))?;
        registry.register(Box::new(searches_total.clone()))?;

        let search_errors = Counter::with_opts(Opts::new(
            "cuttle_search_errors_total",
            "Total number of search errors",
        ))?;
        registry.register(Box::new(search_errors.clone()))?;

        // Gauges
        let total_documents = Gauge::with_opts(Opts::new(
            "cuttle_total_documents",
            "Current number of stored documents",
        ))?;
        registry.register(Box::new(total_documents.clone()))?;

        let indexed_documents = Gauge::with_opts(Opts::new(
            "cuttle_indexed_documents",
            "Current number of documents with an index entry",
        ))?;
        registry.register(Box::new(indexed_documents.clone()))?;

        let distinct_tokens = Gauge::with_opts(Opts::new(
            "cuttle_distinct_tokens",
            "Current number of distinct tokens in the index",
        ))?;
        registry.register(Box::new(distinct_tokens.clone()))?;

        let consistency_warnings = Gauge::with_opts(Opts::new(
            "cuttle_consistency_warnings_total",
            "Searches that referenced a document storage no longer has",
        ))?;
        registry.register(Box::new(consistency_warnings.clone()))?;

        let cache_hits = Gauge::with_opts(Opts::new(
            "cuttle_cache_hits_total",
            "Read cache hits",
        ))?;
        registry.register(Box::new(cache_hits.clone()))?;

        let cache_misses = Gauge::with_opts(Opts::new(
            "cuttle_cache_misses_total",
            "Read cache misses",
        ))?;
        registry.register(Box::new(cache_misses.clone()))?;

        // Histograms
        let index_latency = Histogram::with_opts(
            HistogramOpts::new("cuttle_index_latency_seconds", "Index operation latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        )?;
        registry.register(Box::new(index_latency.clone()))?;

        let search_latency = Histogram::with_opts(
            HistogramOpts::new("cuttle_search_latency_seconds", "Search operation latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        Ok(Self {
            documents_indexed,
            documents_updated,
            documents_deleted,
            searches_total,
            search_errors,
            total_documents,
            indexed_documents,
            distinct_tokens,
            consistency_warnings,
            cache_hits,
            cache_misses,
            index_latency,
            search_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record an add operation
    pub fn record_index(&self, duration_secs: f64) {
        self.documents_indexed.inc();
        self.index_latency.observe(duration_secs);
    }

    /// Record an update operation
    pub fn record_update(&self, duration_secs: f64) {
        self.documents_updated.inc();
        self.index_latency.observe(duration_secs);
    }

    /// Record a delete operation
    pub fn record_delete(&self) {
        self.documents_deleted.inc();
    }

    /// Record a search operation
    pub fn record_search(&self, duration_secs: f64) {
        self.searches_total.inc();
        self.search_latency.observe(duration_secs);
    }

    /// Record a search error
    pub fn record_search_error(&self) {
        self.search_errors.inc();
    }

    /// Push current engine counters into the gauges
    pub fn sync_engine_stats(&self, stats: &EngineStats) {
        self.total_documents.set(stats.total_documents as f64);
        self.indexed_documents.set(stats.indexed_documents as f64);
        self.distinct_tokens.set(stats.distinct_tokens as f64);
        self.consistency_warnings
            .set(stats.consistency_warnings as f64);
        self.cache_hits.set(stats.cache.hits as f64);
        self.cache_misses.set(stats.cache.misses as f64);
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
