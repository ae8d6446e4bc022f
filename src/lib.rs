//! routelog - a resilient client for a route-report JSON backend
//!
//! Hides backend latency and flakiness behind a TTL cache with
//! stale-while-revalidate refresh, in-flight request deduplication and a
//! bounded-retry request executor.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod ops;
pub mod params;
pub mod tasks;

pub use client::{FetchOptions, ReportClient};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::RetryPolicy;
pub use models::{Driver, RecentFilter, Submission, SubmissionDraft};
pub use params::{ParamValue, Params};
pub use tasks::spawn_keepalive_task;
