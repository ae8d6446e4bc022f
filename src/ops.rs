//! Domain Operations Module
//!
//! The named operations exposed to consumers, layered on the cache. Each
//! one fixes a TTL, a timeout and an invalidation behavior; reads degrade
//! gracefully where the data allows it, the write never does.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{FetchOptions, ReportClient};
use crate::error::{ApiError, Result};
use crate::models::{Driver, RecentFilter, Submission, SubmissionDraft};
use crate::params::Params;

impl ReportClient {
    // == Load Route Data ==
    /// Loads the dataset for a route: points, distance matrix, drivers,
    /// point names. Cached for `route_data_ttl`, served stale-while-
    /// revalidate.
    ///
    /// The sibling route (`"1"` vs `"2"`) is prefetched in the background
    /// with the same TTL; its outcome is discarded.
    pub async fn load_route_data(&self, route: &str) -> Result<Value> {
        let route = if route.is_empty() { "1" } else { route };
        let params = Params::new().set("fn", "getData").set("route", route);
        let options = FetchOptions {
            swr: true,
            retries: 0,
            timeout: self.config().data_timeout,
        };
        let ttl = self.config().route_data_ttl;

        let data = self.cached_fetch(&params, ttl, &options).await?;

        let other = if route == "1" { "2" } else { "1" };
        let sibling = Params::new().set("fn", "getData").set("route", other);
        let client = self.clone();
        tokio::spawn(async move {
            let _ = client.cached_fetch(&sibling, ttl, &options).await;
        });

        Ok(data)
    }

    // == Load Recent ==
    /// Lists recent submissions for a filter set. Cached for `recent_ttl`,
    /// served stale-while-revalidate.
    ///
    /// A payload without a usable `items` array yields an empty list, and
    /// individually malformed records are skipped with a warning; a
    /// listing never fails on bad rows.
    pub async fn load_recent(&self, filter: &RecentFilter) -> Result<Vec<Submission>> {
        let options = FetchOptions {
            swr: true,
            retries: 0,
            timeout: self.config().recent_timeout,
        };
        let response = self
            .cached_fetch(&filter.to_params(), self.config().recent_ttl, &options)
            .await?;

        let items = match response.get("items") {
            Some(Value::Array(items)) => items.clone(),
            _ => return Ok(Vec::new()),
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Submission>(item) {
                Ok(submission) => Some(submission),
                Err(err) => {
                    warn!(error = %err, "skipping malformed submission record");
                    None
                }
            })
            .collect())
    }

    // == Save Submission ==
    /// Submits a report. Always bypasses the cache and never retries: a
    /// write must not be silently duplicated.
    ///
    /// On success the recent-listing cache families are invalidated
    /// (every limit-keyed listing, plus the listings for this route) so
    /// the next read observes the new submission. Returns the payload's
    /// `saved` field. On failure nothing in the cache changes.
    pub async fn save_submission(&self, draft: &SubmissionDraft) -> Result<Value> {
        if let Some(message) = draft.validate() {
            return Err(ApiError::InvalidRequest(message));
        }

        let policy = self.retry_policy(0, self.config().submit_timeout);
        let response = self.executor().post_form(&draft.to_form(), &policy).await?;

        self.invalidate("fn=recent&limit=");
        let route_prefix = Params::new()
            .set("fn", "recent")
            .set("route", draft.route.as_str())
            .encode();
        self.invalidate(&route_prefix);

        Ok(response.get("saved").cloned().unwrap_or(Value::Null))
    }

    // == List Drivers ==
    /// Fetches the driver roster, for filter dropdowns and forms.
    ///
    /// Uncached and best-effort: any failure logs a warning and yields an
    /// empty roster.
    pub async fn list_drivers(&self) -> Vec<Driver> {
        let params = Params::new().set("fn", "getDrivers");
        let policy = self.retry_policy(0, self.config().data_timeout);

        match self.executor().get_json(&params, &policy).await {
            Ok(response) => {
                // The backend answers with either a bare array or {drivers: [...]}
                let list = if response.is_array() {
                    response
                } else {
                    response.get("drivers").cloned().unwrap_or(Value::Null)
                };
                serde_json::from_value(list).unwrap_or_default()
            }
            Err(err) => {
                warn!(error = %err, "driver list unavailable");
                Vec::new()
            }
        }
    }

    // == Ping ==
    /// Single best-effort health probe. Returns whether the backend
    /// answered with a truthy `pong`; never errors.
    pub async fn ping(&self) -> bool {
        let params = Params::new().set("fn", "ping");
        let policy = self.retry_policy(0, self.config().ping_timeout);

        match self.executor().get_json(&params, &policy).await {
            Ok(response) => is_truthy(response.get("pong").unwrap_or(&Value::Null)),
            Err(err) => {
                debug!(error = %err, "ping failed");
                false
            }
        }
    }
}

/// Truthiness the way the backend's original consumers read it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
