//! Cache Statistics Module
//!
//! Tracks hit/miss and maintenance counters for the client cache.

use serde::Serialize;

// == Cache Stats ==
/// Performance counters for the cache layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry
    pub hits: u64,
    /// Lookups that found no fresh entry
    pub misses: u64,
    /// Background stale-while-revalidate refreshes that landed
    pub refreshes: u64,
    /// Entries removed by prefix invalidation
    pub invalidated: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    // == Recording ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    pub fn record_invalidated(&mut self, count: u64) {
        self.invalidated += count;
    }

    // == Hit Rate ==
    /// Fraction of lookups answered from cache; NaN when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        self.hits as f64 / (self.hits + self.misses) as f64
    }
}
