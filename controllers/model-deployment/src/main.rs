//! ModelDeployment Controller
//!
//! Reconciles `ModelDeployment` CRDs into inference-serving child resources:
//! - A workload Deployment running the inference server for one model version
//! - A ClusterIP Service exposing the serving port
//! - An optional HorizontalPodAutoscaler when autoscaling is enabled
//!
//! Desired child state is re-derived from the spec on every pass; drift is
//! detected by periodic polling of the workload's replica readiness.

mod controller;
mod error;
mod manifests;
mod reconciler;
mod status;
#[cfg(test)]
mod test_utils;
mod watcher;

use controller::Controller;
use std::env;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting ModelDeployment Controller");

    // Load configuration from environment variables
    let namespace = env::var("WATCH_NAMESPACE").ok();
    let interval_secs = env::var("RECONCILE_INTERVAL_SECONDS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60);

    info!("Configuration:");
    info!(
        "  Namespace: {}",
        namespace.as_deref().unwrap_or("all namespaces")
    );
    info!("  Drift check interval: {}s", interval_secs);

    // Initialize and run controller
    let controller = Controller::new(namespace, Duration::from_secs(interval_secs)).await?;
    controller.run().await?;

    Ok(())
}
