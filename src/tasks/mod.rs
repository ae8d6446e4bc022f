//! Background Tasks Module
//!
//! Detached best-effort tasks that run alongside a consumer.
//!
//! # Tasks
//! - Keep-alive: pings the backend at a fixed interval

mod keepalive;

pub use keepalive::spawn_keepalive_task;
