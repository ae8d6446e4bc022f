//! Error types for the report client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Api Error Enum ==
/// Unified error type for all client operations.
///
/// The enum is `Clone` so a single settled in-flight request can hand the
/// same outcome to every caller that was awaiting it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The per-attempt deadline elapsed before the response body completed
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS or other transport-level failure
    #[error("network failure: {0}")]
    Network(String),

    /// Backend answered with a 5xx status
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Backend answered with a 4xx status
    #[error("client error (HTTP {status}): {message}")]
    Client { status: u16, message: String },

    /// Response body was not JSON (the backend serves HTML error pages)
    #[error("non-JSON response (HTTP {status})")]
    NonJson { status: u16 },

    /// Backend returned a JSON payload with an explicit `ok: false`
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Request data failed validation before reaching the wire
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client was constructed with an unusable endpoint or settings
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Runtime plumbing failure (a detached fetch task died)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    // == Status ==
    /// Returns the HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. }
            | ApiError::Client { status, .. }
            | ApiError::NonJson { status }
            | ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    // == Retriability ==
    /// Decides whether another attempt may help.
    ///
    /// Timeouts and transport failures are transient by nature. For errors
    /// carrying an HTTP status the rule is: 5xx yes, everything else no.
    /// A non-JSON body counts as retriable only when the backend signalled
    /// 5xx alongside it (an overloaded gateway serving an HTML error page).
    pub fn is_retriable(&self) -> bool {
        match self {
            ApiError::Timeout | ApiError::Network(_) => true,
            _ => matches!(self.status(), Some(status) if (500..=599).contains(&status)),
        }
    }

    /// Builds the status-classified error for a non-success response or an
    /// `ok: false` payload.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            500..=599 => ApiError::Server { status, message },
            400..=499 => ApiError::Client { status, message },
            _ => ApiError::Api { status, message },
        }
    }

    /// Classifies a transport error from the HTTP layer.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.without_url().to_string())
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the report client.
pub type Result<T> = std::result::Result<T, ApiError>;

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_and_network_are_retriable() {
        assert!(ApiError::Timeout.is_retriable());
        assert!(ApiError::Network("connection reset".to_string()).is_retriable());
    }

    #[test]
    fn test_server_errors_are_retriable() {
        let err = ApiError::from_status(503, "HTTP 503".to_string());
        assert!(matches!(err, ApiError::Server { status: 503, .. }));
        assert!(err.is_retriable());
    }

    #[test]
    fn test_client_errors_fail_fast() {
        let err = ApiError::from_status(404, "HTTP 404".to_string());
        assert!(matches!(err, ApiError::Client { status: 404, .. }));
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_api_failure_not_retriable() {
        let err = ApiError::from_status(200, "route unknown".to_string());
        assert!(matches!(err, ApiError::Api { status: 200, .. }));
        assert!(!err.is_retriable());
        assert_eq!(err.to_string(), "route unknown");
    }

    #[test]
    fn test_non_json_retriability_follows_status() {
        assert!(ApiError::NonJson { status: 502 }.is_retriable());
        assert!(!ApiError::NonJson { status: 200 }.is_retriable());
        assert!(!ApiError::NonJson { status: 403 }.is_retriable());
    }

    #[test]
    fn test_status_attachment() {
        assert_eq!(ApiError::NonJson { status: 502 }.status(), Some(502));
        assert_eq!(ApiError::Timeout.status(), None);
        assert_eq!(
            ApiError::Internal("task died".to_string()).status(),
            None
        );
    }
}
