//! Configuration Module
//!
//! Handles client configuration from explicit construction or environment
//! variables.

use std::env;
use std::time::Duration;

/// Client configuration parameters.
///
/// TTLs are kept slightly below the backend's own cache windows so a
/// client-side hit can never outlive the server-side data it mirrors.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend endpoint URL (a single URL; operations dispatch on `fn`)
    pub endpoint: String,
    /// Shared static secret appended to every call
    pub secret: String,
    /// TTL for the per-route dataset
    pub route_data_ttl: Duration,
    /// TTL for recent-submission listings
    pub recent_ttl: Duration,
    /// Timeout per attempt for dataset loads
    pub data_timeout: Duration,
    /// Timeout per attempt for recent-submission loads
    pub recent_timeout: Duration,
    /// Timeout for report submission (a single, never-retried attempt)
    pub submit_timeout: Duration,
    /// Timeout for the health probe
    pub ping_timeout: Duration,
    /// Additional attempts after the first, for reads that opt in
    pub default_retries: u32,
    /// Base delay for retry backoff
    pub backoff_base: Duration,
    /// Interval between keep-alive pings
    pub keepalive_interval: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given endpoint and secret with
    /// default tuning.
    pub fn new(endpoint: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            secret: secret.into(),
            ..Self::default()
        }
    }

    /// Creates a configuration by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ROUTELOG_ENDPOINT` - Backend endpoint URL (default: empty)
    /// - `ROUTELOG_SECRET` - Shared secret (default: empty)
    /// - `ROUTELOG_DATA_TTL_SECS` - Dataset TTL in seconds (default: 240)
    /// - `ROUTELOG_RECENT_TTL_SECS` - Recent-list TTL in seconds (default: 90)
    /// - `ROUTELOG_RETRIES` - Default retry count for reads (default: 1)
    /// - `ROUTELOG_BACKOFF_MS` - Backoff base in milliseconds (default: 300)
    /// - `ROUTELOG_KEEPALIVE_SECS` - Keep-alive interval in seconds (default: 240)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env::var("ROUTELOG_ENDPOINT").unwrap_or_default(),
            secret: env::var("ROUTELOG_SECRET").unwrap_or_default(),
            route_data_ttl: env_duration_secs("ROUTELOG_DATA_TTL_SECS", defaults.route_data_ttl),
            recent_ttl: env_duration_secs("ROUTELOG_RECENT_TTL_SECS", defaults.recent_ttl),
            default_retries: env::var("ROUTELOG_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_retries),
            backoff_base: env::var("ROUTELOG_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.backoff_base),
            keepalive_interval: env_duration_secs(
                "ROUTELOG_KEEPALIVE_SECS",
                defaults.keepalive_interval,
            ),
            ..defaults
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            secret: String::new(),
            route_data_ttl: Duration::from_secs(240),
            recent_ttl: Duration::from_secs(90),
            data_timeout: Duration::from_secs(8),
            recent_timeout: Duration::from_secs(6),
            submit_timeout: Duration::from_secs(12),
            ping_timeout: Duration::from_secs(4),
            default_retries: 1,
            backoff_base: Duration::from_millis(300),
            keepalive_interval: Duration::from_secs(240),
        }
    }
}

fn env_duration_secs(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.route_data_ttl, Duration::from_secs(240));
        assert_eq!(config.recent_ttl, Duration::from_secs(90));
        assert_eq!(config.default_retries, 1);
        assert_eq!(config.backoff_base, Duration::from_millis(300));
        assert_eq!(config.keepalive_interval, Duration::from_secs(240));
    }

    #[test]
    fn test_config_new_keeps_tuning_defaults() {
        let config = ClientConfig::new("http://localhost:9000/exec", "s3cret");
        assert_eq!(config.endpoint, "http://localhost:9000/exec");
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.submit_timeout, Duration::from_secs(12));
        assert_eq!(config.ping_timeout, Duration::from_secs(4));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("ROUTELOG_ENDPOINT");
        env::remove_var("ROUTELOG_SECRET");
        env::remove_var("ROUTELOG_DATA_TTL_SECS");
        env::remove_var("ROUTELOG_RECENT_TTL_SECS");
        env::remove_var("ROUTELOG_RETRIES");
        env::remove_var("ROUTELOG_BACKOFF_MS");
        env::remove_var("ROUTELOG_KEEPALIVE_SECS");

        let config = ClientConfig::from_env();
        assert!(config.endpoint.is_empty());
        assert_eq!(config.route_data_ttl, Duration::from_secs(240));
        assert_eq!(config.recent_ttl, Duration::from_secs(90));
        assert_eq!(config.default_retries, 1);
    }
}
