//! Metrics collection module
//!
//! Tracks per-collection query counts, error rates and response times.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Response times kept per collection
const MAX_SAMPLES: usize = 100;

/// Metrics collector shared by all requests
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    /// Searches that ended in a failure
    failed_searches: AtomicU64,
    /// Queries per collection
    collection_queries: RwLock<HashMap<String, u64>>,
    /// Collection response times in ms (last MAX_SAMPLES)
    collection_response_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Collection error counts
    collection_errors: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            failed_searches: AtomicU64::new(0),
            collection_queries: RwLock::new(HashMap::new()),
            collection_response_times: RwLock::new(HashMap::new()),
            collection_errors: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed search count
    pub fn inc_failed_search(&self) {
        self.failed_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful collection query and its response time
    pub fn record_success(&self, collection: &str, time_ms: u64) {
        self.record_query(collection);

        let mut times = self
            .collection_response_times
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = times.entry(collection.to_string()).or_default();
        if entry.len() >= MAX_SAMPLES {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record a failed collection query
    pub fn record_error(&self, collection: &str) {
        self.record_query(collection);

        let mut errors = self
            .collection_errors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *errors.entry(collection.to_string()).or_insert(0) += 1;
    }

    fn record_query(&self, collection: &str) {
        let mut queries = self
            .collection_queries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *queries.entry(collection.to_string()).or_insert(0) += 1;
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get failed searches
    pub fn get_failed_searches(&self) -> u64 {
        self.failed_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a collection
    pub fn get_avg_response_time(&self, collection: &str) -> Option<u64> {
        let times = self
            .collection_response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        times.get(collection).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Get reliability percentage for a collection
    pub fn get_reliability(&self, collection: &str) -> f64 {
        let queries = self
            .collection_queries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let errors = self
            .collection_errors
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let total = *queries.get(collection).unwrap_or(&0);
        let error_count = *errors.get(collection).unwrap_or(&0);

        if total == 0 {
            100.0
        } else {
            ((total - error_count) as f64 / total as f64) * 100.0
        }
    }

    /// Get all collection statistics
    pub fn get_collection_stats(&self) -> HashMap<String, CollectionStats> {
        let queries = self
            .collection_queries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let errors = self
            .collection_errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        queries
            .into_iter()
            .map(|(name, count)| {
                let stats = CollectionStats {
                    queries: count,
                    errors: *errors.get(&name).unwrap_or(&0),
                    avg_response_time: self.get_avg_response_time(&name),
                    reliability: self.get_reliability(&name),
                };
                (name, stats)
            })
            .collect()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub queries: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}
