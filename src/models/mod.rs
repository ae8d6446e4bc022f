//! Request and Response models for the report backend
//!
//! This module defines the DTOs used on the wire: outgoing submissions and
//! filters, and the loosely-typed shapes the backend sends back.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{RecentFilter, SubmissionDraft};
pub use responses::{Driver, Submission};
