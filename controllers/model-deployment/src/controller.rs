//! Main controller implementation.
//!
//! Owns the Kubernetes client and the background watcher task for
//! ModelDeployment resources.

use crate::error::ControllerError;
use crate::watcher::{Context, Watcher};
use kube::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Controller for ModelDeployment resource management.
pub struct Controller {
    model_deployment_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a controller watching `namespace` (or all namespaces when
    /// `None`) and re-checking settled objects every `requeue_interval`.
    pub async fn new(
        namespace: Option<String>,
        requeue_interval: Duration,
    ) -> Result<Self, ControllerError> {
        info!("Initializing ModelDeployment controller");

        let client = Client::try_default()
            .await
            .map_err(|e| ControllerError::Kube(e.into()))?;

        let context = Arc::new(Context {
            client,
            requeue_interval,
        });
        let watcher = Arc::new(Watcher::new(context, namespace.as_deref()));

        let model_deployment_watcher = {
            let watcher = watcher.clone();
            tokio::spawn(async move { watcher.watch_model_deployments().await })
        };

        Ok(Self {
            model_deployment_watcher,
        })
    }

    /// Runs the controller until shutdown.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("ModelDeployment controller running");

        self.model_deployment_watcher
            .await
            .map_err(|e| {
                ControllerError::Watch(format!("ModelDeployment watcher panicked: {e}"))
            })?
            .map_err(|e| ControllerError::Watch(format!("ModelDeployment watcher error: {e}")))?;

        Ok(())
    }
}
