//! Keep-Alive Task
//!
//! Background task that periodically pings the backend so its cold-start
//! window stays warm while a consumer is open.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::client::ReportClient;

/// Spawns a background task that pings the backend on a fixed interval.
///
/// The probe is best-effort: a failed ping is logged and the loop carries
/// on. The task runs until aborted.
///
/// # Arguments
/// * `client` - Client handle the pings go through
/// * `interval` - Delay between probes
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_keepalive_task(client.clone(), Duration::from_secs(240));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_keepalive_task(client: ReportClient, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "starting keep-alive task");

        loop {
            tokio::time::sleep(interval).await;

            if client.ping().await {
                debug!("keep-alive ping answered");
            } else {
                debug!("keep-alive ping went unanswered");
            }
        }
    })
}
