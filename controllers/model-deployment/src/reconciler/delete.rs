//! Teardown of child resources.

use super::{Reconciler, identity};
use crate::error::ControllerError;
use cluster_store::sync;
use crds::{ModelDeployment, autoscaler_name, service_name, workload_name};
use tracing::{info, warn};

impl Reconciler {
    /// Deletes all child resources. A failure on one kind does not stop the
    /// others; the first error is surfaced so the pass is retried and the
    /// finalizer stays until every kind is gone.
    pub(super) async fn delete(&self, md: &ModelDeployment) -> Result<(), ControllerError> {
        let (name, namespace) = identity(md)?;
        info!("Deleting ModelDeployment {namespace}/{name}");

        let mut first_error = None;

        if let Err(e) = sync(self.stores.workloads.as_ref(), &workload_name(name), None).await {
            warn!("Failed to delete Deployment {}: {e}", workload_name(name));
            first_error.get_or_insert(e);
        }
        if let Err(e) = sync(self.stores.services.as_ref(), &service_name(name), None).await {
            warn!("Failed to delete Service {}: {e}", service_name(name));
            first_error.get_or_insert(e);
        }
        if let Err(e) =
            sync(self.stores.autoscalers.as_ref(), &autoscaler_name(name), None).await
        {
            warn!(
                "Failed to delete HorizontalPodAutoscaler {}: {e}",
                autoscaler_name(name)
            );
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => {
                info!("Successfully deleted all resources for ModelDeployment {name}");
                Ok(())
            }
        }
    }
}
