//! Initial provisioning of child resources.

use super::{Reconciler, identity};
use crate::error::ControllerError;
use crate::manifests;
use crate::status;
use cluster_store::sync;
use crds::{ModelDeployment, ModelDeploymentStatus, autoscaler_name, service_name, workload_name};
use tracing::info;

impl Reconciler {
    /// Creates the Deployment, Service and (if enabled) HorizontalPodAutoscaler
    /// for a new ModelDeployment. Stops at the first failure; the pass is
    /// retried from the top and each sync is idempotent.
    pub(super) async fn create(
        &self,
        md: &ModelDeployment,
    ) -> Result<ModelDeploymentStatus, ControllerError> {
        let (name, namespace) = identity(md)?;
        info!("Creating ModelDeployment {namespace}/{name}");
        info!("Model: {} v{}", md.spec.model_name, md.spec.model_version);

        let workload = manifests::workload(&md.spec, name, namespace);
        sync(
            self.stores.workloads.as_ref(),
            &workload_name(name),
            Some(&workload),
        )
        .await?;

        let service = manifests::service(&md.spec, name, namespace);
        sync(
            self.stores.services.as_ref(),
            &service_name(name),
            Some(&service),
        )
        .await?;

        let autoscaler = manifests::autoscaler(&md.spec, name, namespace);
        sync(
            self.stores.autoscalers.as_ref(),
            &autoscaler_name(name),
            autoscaler.as_ref(),
        )
        .await?;

        Ok(status::created(md))
    }
}
