//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL freshness.

use std::time::{Duration, Instant};

use serde_json::Value;

// == Cache Entry ==
/// A single cached payload with its insertion time and time-to-live.
///
/// Entries are replaced wholesale on refresh, never merged. Staleness is
/// implicit: an entry past its TTL is simply skipped on lookup and
/// overwritten by the next successful fetch.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// When the payload was stored (monotonic clock, immune to wall-clock steps)
    pub inserted_at: Instant,
    /// How long the payload stays fresh
    pub ttl: Duration,
    /// The cached JSON payload
    pub data: Value,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry timestamped now.
    pub fn new(data: Value, ttl: Duration) -> Self {
        Self {
            inserted_at: Instant::now(),
            ttl,
            data,
        }
    }

    // == Is Fresh ==
    /// Checks whether the entry is still within its TTL.
    ///
    /// Boundary condition: freshness requires `age < ttl` strictly, so an
    /// entry whose TTL has fully elapsed is stale immediately, and a
    /// zero-TTL entry is never fresh.
    pub fn is_fresh(&self) -> bool {
        self.age() < self.ttl
    }

    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }
}
