//! Request Executor Module
//!
//! Issues single JSON-over-HTTP calls with a per-attempt timeout and a
//! bounded retry loop with backoff and jitter. The backend answers on one
//! URL and dispatches on an `fn` query parameter; failure pages come back
//! as HTML, so every response is read as text and parsed explicitly.

use std::time::Duration;

use chrono::Utc;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, Result};
use crate::params::Params;

// == Retry Policy ==
/// Retry configuration for one logical request.
///
/// `retries` counts additional attempts after the first, so the total
/// number of attempts is `retries + 1`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum additional attempts after the first
    pub retries: u32,
    /// Deadline applied to each attempt, connect through body read
    pub timeout: Duration,
    /// Base delay for the backoff between attempts
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            timeout: Duration::from_secs(8),
            backoff_base: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    /// A single-attempt policy, for calls that must never repeat.
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            retries: 0,
            timeout,
            ..Self::default()
        }
    }
}

// == Executor ==
/// Issues HTTP calls against the backend endpoint.
///
/// Every outgoing request carries the shared `secret` and a `_ts`
/// epoch-millis query parameter that defeats any intermediary cache.
#[derive(Debug, Clone)]
pub struct Executor {
    http: reqwest::Client,
    endpoint: Url,
    secret: String,
}

impl Executor {
    // == Constructor ==
    /// Creates an executor for the given endpoint URL and shared secret.
    pub fn new(endpoint: &str, secret: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| ApiError::InvalidConfig(format!("endpoint URL: {err}")))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::InvalidConfig(err.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            secret: secret.to_string(),
        })
    }

    // == GET ==
    /// Fetches a JSON payload; `params` become query parameters.
    ///
    /// The URL (including `_ts`) is built once and reused for every retry
    /// attempt of this logical request.
    pub async fn get_json(&self, params: &Params, policy: &RetryPolicy) -> Result<Value> {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter_rendered() {
                pairs.append_pair(key, &value);
            }
            pairs.append_pair("secret", &self.secret);
            pairs.append_pair("_ts", &Utc::now().timestamp_millis().to_string());
        }

        let request = self.http.get(url).timeout(policy.timeout);
        self.execute(request, policy).await
    }

    // == POST ==
    /// Posts a form-urlencoded body; `fields` plus the secret become the
    /// body, `_ts` stays in the query string.
    pub async fn post_form(&self, fields: &Params, policy: &RetryPolicy) -> Result<Value> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("_ts", &Utc::now().timestamp_millis().to_string());

        let mut form = fields.to_pairs();
        form.push(("secret".to_string(), self.secret.clone()));

        let request = self.http.post(url).timeout(policy.timeout).form(&form);
        self.execute(request, policy).await
    }

    // == Attempt Loop ==
    /// Runs up to `retries + 1` attempts with backoff between them.
    ///
    /// Non-retriable failures and the final attempt's failure propagate
    /// immediately; client errors are never retried.
    async fn execute(&self, request: RequestBuilder, policy: &RetryPolicy) -> Result<Value> {
        let mut last_err = ApiError::Internal("no attempt was made".to_string());

        for attempt in 0..=policy.retries {
            let prepared = request
                .try_clone()
                .ok_or_else(|| ApiError::Internal("request is not replayable".to_string()))?;

            match Self::attempt(prepared).await {
                Ok(data) => return Ok(data),
                Err(err) => {
                    if attempt == policy.retries || !err.is_retriable() {
                        return Err(err);
                    }
                    let delay = backoff_delay(policy.backoff_base, attempt);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    last_err = err;
                }
            }
        }

        Err(last_err)
    }

    /// One attempt: send, read the full body as text, parse, classify.
    async fn attempt(request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status().as_u16();
        let success = response.status().is_success();
        let text = response.text().await.map_err(ApiError::from_transport)?;

        let data: Value =
            serde_json::from_str(&text).map_err(|_| ApiError::NonJson { status })?;

        if !success || data.get("ok").and_then(Value::as_bool) == Some(false) {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ApiError::from_status(status, message));
        }

        Ok(data)
    }
}

// == Backoff ==
/// Delay before attempt `attempt + 1`: a linearly growing base with up to
/// 2x multiplicative jitter, deliberately uncapped.
pub(crate) fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let jitter = 1.0 + rand::random::<f64>();
    base.mul_f64(f64::from(attempt + 1) * jitter)
}
