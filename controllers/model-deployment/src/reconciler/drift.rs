//! Periodic health check of the workload.

use super::{Reconciler, identity};
use crate::error::ControllerError;
use crate::status;
use crds::{DeploymentPhase, ModelDeployment, ModelDeploymentStatus, workload_name};
use tracing::debug;

impl Reconciler {
    /// Reads the workload and reports its health. This path never mutates
    /// child resources; a missing workload is a failure, not a trigger to
    /// recreate it. Returns `None` when nothing changed so the watcher can
    /// skip the status write.
    pub(super) async fn drift_check(
        &self,
        md: &ModelDeployment,
    ) -> Result<Option<ModelDeploymentStatus>, ControllerError> {
        let (name, _namespace) = identity(md)?;

        let workload = self.stores.workloads.get(&workload_name(name)).await?;
        let desired = workload.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
        let ready = workload
            .status
            .as_ref()
            .and_then(|s| s.ready_replicas)
            .unwrap_or(0);

        let phase = if ready == desired {
            DeploymentPhase::Running
        } else {
            DeploymentPhase::Updating
        };

        if status::phase_or_ready_changed(md.status.as_ref(), phase, ready) {
            Ok(Some(status::health(md, phase, desired, ready)))
        } else {
            debug!("ModelDeployment {name} unchanged, skipping status write");
            Ok(None)
        }
    }
}
