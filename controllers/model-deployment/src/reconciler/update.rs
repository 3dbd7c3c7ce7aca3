//! Convergence after a spec change.

use super::{Reconciler, identity};
use crate::error::ControllerError;
use crate::manifests;
use crate::status;
use cluster_store::sync;
use crds::{ModelDeployment, ModelDeploymentStatus, autoscaler_name, service_name, workload_name};
use tracing::info;

impl Reconciler {
    /// Re-syncs all child resources against the current spec. Disabling
    /// autoscaling removes the HorizontalPodAutoscaler; enabling it creates
    /// one. Everything else is patched in place.
    pub(super) async fn update(
        &self,
        md: &ModelDeployment,
    ) -> Result<ModelDeploymentStatus, ControllerError> {
        let (name, namespace) = identity(md)?;
        info!("Updating ModelDeployment {namespace}/{name}");

        let previous_version = md.status.as_ref().and_then(|s| s.observed_model_version);
        if previous_version.is_some_and(|v| v != md.spec.model_version) {
            info!(
                "Model version changing from {} to {}",
                previous_version.unwrap_or_default(),
                md.spec.model_version
            );
        }

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

        Ok(status::updated(md))
    }
}
