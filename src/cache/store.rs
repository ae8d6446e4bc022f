//! Cache Store Module
//!
//! The client-side cache table: encoded parameter strings mapped to
//! timestamped JSON payloads, with prefix invalidation.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// In-memory cache keyed by canonical parameter strings.
///
/// The table is unbounded and lives for the process lifetime. Stale
/// entries are never proactively purged; they are skipped on lookup and
/// overwritten by the next successful fetch for their key. The only
/// explicit removal path is [`CacheStore::invalidate_prefix`].
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get Fresh ==
    /// Returns the cached payload for `key` if it is still within its TTL.
    ///
    /// A stale or absent entry counts as a miss. The stale entry itself is
    /// left in place so a later insert simply replaces it.
    pub fn get_fresh(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh() => {
                self.stats.record_hit();
                Some(entry.data.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores a payload under `key`, replacing any previous entry and
    /// restarting its TTL window.
    pub fn insert(&mut self, key: String, data: Value, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(data, ttl));
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// This is plain substring-prefix matching on the encoded key, not a
    /// semantic parameter match; callers pick prefixes accordingly.
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();
        self.stats.record_invalidated(removed as u64);
        removed
    }

    // == Refresh Accounting ==
    /// Records a background refresh that replaced an entry.
    pub fn record_refresh(&mut self) {
        self.stats.record_refresh();
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Length ==
    /// Returns the current number of entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the raw entry, fresh or stale. Test and diagnostics helper.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }
}
