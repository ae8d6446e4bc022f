//! routelog watcher - a thin terminal consumer of the report client
//!
//! Polls the backend for recent submissions and prints them as JSON
//! lines, with the keep-alive task running alongside.

use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routelog::{spawn_keepalive_task, ClientConfig, RecentFilter, ReportClient};

/// Main entry point for the routelog watcher.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Construct the report client
/// 4. Start the background keep-alive task
/// 5. Poll recent submissions on a fixed interval
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routelog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting routelog watcher");

    let config = ClientConfig::from_env();
    if config.endpoint.is_empty() {
        anyhow::bail!("ROUTELOG_ENDPOINT is not set");
    }
    info!(
        endpoint = %config.endpoint,
        keepalive_secs = config.keepalive_interval.as_secs(),
        "configuration loaded"
    );

    let client = ReportClient::new(config.clone()).context("building report client")?;

    let keepalive_handle = spawn_keepalive_task(client.clone(), config.keepalive_interval);

    if client.ping().await {
        info!("backend reachable");
    } else {
        warn!("backend did not answer the initial ping");
    }

    let route = std::env::var("ROUTELOG_ROUTE").unwrap_or_default();
    let filter = RecentFilter::for_route(route, 10);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut ticker = tokio::time::interval(Duration::from_secs(60));
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                match client.load_recent(&filter).await {
                    Ok(items) => {
                        // One bad record must not blank the whole listing
                        for item in &items {
                            if let Ok(line) = serde_json::to_string(item) {
                                println!("{line}");
                            }
                        }
                        info!(count = items.len(), "recent submissions");
                    }
                    Err(err) => warn!(error = %err, "recent listing failed"),
                }
            }
        }
    }

    keepalive_handle.abort();
    info!("Watcher shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
