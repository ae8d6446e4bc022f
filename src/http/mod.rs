//! HTTP Module
//!
//! The resilient request layer: timeout, bounded retry, backoff.

mod executor;

pub use executor::{Executor, RetryPolicy};
