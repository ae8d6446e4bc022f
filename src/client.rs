//! Report Client Module
//!
//! The cache and deduplication layer over the request executor. A
//! `ReportClient` is an explicitly constructed handle owning its own cache
//! table and in-flight table, so tests get isolated instances instead of
//! process-wide state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{Executor, RetryPolicy};
use crate::params::Params;

/// Pending result handle shared by every caller awaiting the same key.
type InFlightFetch = Shared<BoxFuture<'static, Result<Value>>>;

// == Fetch Options ==
/// Per-call options for [`ReportClient::cached_fetch`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// On a fresh hit, also refresh the entry in the background
    pub swr: bool,
    /// Additional attempts after the first
    pub retries: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            swr: true,
            retries: 1,
            timeout: Duration::from_secs(8),
        }
    }
}

// == Client State ==
/// Cache table and in-flight table behind one lock.
///
/// Both tables are checked and updated inside short synchronous critical
/// sections; no await point ever sits between a check and the matching
/// insert or removal.
struct ClientState {
    cache: CacheStore,
    in_flight: HashMap<String, InFlightFetch>,
}

struct ClientInner {
    executor: Executor,
    config: ClientConfig,
    state: Mutex<ClientState>,
}

// == Report Client ==
/// Caching, deduplicating client for the report backend.
///
/// Cheap to clone; all clones share one cache and one in-flight table.
#[derive(Clone)]
pub struct ReportClient {
    inner: Arc<ClientInner>,
}

impl ReportClient {
    // == Constructor ==
    /// Creates a client from the given configuration.
    ///
    /// Fails when the endpoint URL cannot be parsed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let executor = Executor::new(&config.endpoint, &config.secret)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                executor,
                config,
                state: Mutex::new(ClientState {
                    cache: CacheStore::new(),
                    in_flight: HashMap::new(),
                }),
            }),
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn executor(&self) -> &Executor {
        &self.inner.executor
    }

    pub(crate) fn retry_policy(&self, retries: u32, timeout: Duration) -> RetryPolicy {
        RetryPolicy {
            retries,
            timeout,
            backoff_base: self.inner.config.backoff_base,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ClientState> {
        self.inner.state.lock().expect("client state lock poisoned")
    }

    // == Cached Fetch ==
    /// Returns the payload for `params`, consulting the cache first.
    ///
    /// - Fresh entry: returned immediately. With `options.swr` a detached
    ///   background refresh is spawned; its outcome never reaches the
    ///   caller and it is not deduplicated against a concurrent foreground
    ///   fetch for the same key (last writer wins on the cache table).
    /// - Pending fetch for the same key: awaited and shared. The executor's
    ///   error, if any, reaches every waiter unchanged.
    /// - Otherwise a new fetch starts, registered in the in-flight table
    ///   for the duration of the request.
    ///
    /// At most one foreground request per key is in flight at any instant.
    pub async fn cached_fetch(
        &self,
        params: &Params,
        ttl: Duration,
        options: &FetchOptions,
    ) -> Result<Value> {
        let key = params.encode();
        let policy = self.retry_policy(options.retries, options.timeout);

        let fetch = {
            // One synchronous critical section covers the freshness check
            // and the in-flight check-and-insert, so two concurrent calls
            // for the same key always observe each other.
            let mut state = self.lock_state();

            if let Some(data) = state.cache.get_fresh(&key) {
                if options.swr {
                    self.spawn_background_refresh(params.clone(), ttl, policy);
                }
                return Ok(data);
            }

            if let Some(pending) = state.in_flight.get(&key) {
                pending.clone()
            } else {
                let fetch = self.begin_fetch(key.clone(), params.clone(), ttl, policy);
                state.in_flight.insert(key, fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    /// Starts a fetch as a detached task and returns its shared handle.
    ///
    /// Spawning keeps the original promise semantics: the request settles
    /// and the in-flight entry is removed even if every waiter is dropped
    /// mid-request. The cache write and the in-flight removal happen under
    /// the same lock acquisition.
    fn begin_fetch(
        &self,
        key: String,
        params: Params,
        ttl: Duration,
        policy: RetryPolicy,
    ) -> InFlightFetch {
        let client = self.clone();
        let task = tokio::spawn(async move {
            let result = client.inner.executor.get_json(&params, &policy).await;

            let mut state = client.lock_state();
            if let Ok(data) = &result {
                state.cache.insert(key.clone(), data.clone(), ttl);
            }
            state.in_flight.remove(&key);

            result
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(err) => Err(ApiError::Internal(format!("fetch task failed: {err}"))),
            }
        }
        .boxed()
        .shared()
    }

    /// Fire-and-forget refresh of a still-fresh entry.
    fn spawn_background_refresh(&self, params: Params, ttl: Duration, policy: RetryPolicy) {
        let client = self.clone();
        tokio::spawn(async move {
            let key = params.encode();
            match client.inner.executor.get_json(&params, &policy).await {
                Ok(data) => {
                    let mut state = client.lock_state();
                    state.cache.insert(key, data, ttl);
                    state.cache.record_refresh();
                }
                Err(err) => debug!(error = %err, "background refresh failed"),
            }
        });
    }

    // == Invalidation ==
    /// Removes every cache entry whose key starts with `prefix`.
    ///
    /// Matching is textual on the encoded key, so prefixes must be chosen
    /// with the canonical key order in mind. Returns the removed count.
    pub fn invalidate(&self, prefix: &str) -> usize {
        let removed = self.lock_state().cache.invalidate_prefix(prefix);
        if removed > 0 {
            debug!(prefix, removed, "cache entries invalidated");
        }
        removed
    }

    /// Removes every cache entry matching the encoded form of `params`.
    pub fn invalidate_params(&self, params: &Params) -> usize {
        self.invalidate(&params.encode())
    }

    // == Introspection ==
    /// Snapshot of the cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.lock_state().cache.stats()
    }

    /// Number of cache entries, fresh or stale.
    pub fn cache_len(&self) -> usize {
        self.lock_state().cache.len()
    }
}
