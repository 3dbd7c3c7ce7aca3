//! Reconciliation passes for ModelDeployment objects.
//!
//! Each pass runs under exactly one trigger. Creation, update and deletion
//! converge child resources toward the spec; drift checks only read the
//! workload and report health. The reconciler itself never touches the
//! ModelDeployment object, it hands a [`PassReport`] back to the watcher,
//! which owns the status write and the requeue decision.

mod create;
mod delete;
mod drift;
mod update;

use crate::error::ControllerError;
use crate::status;
use cluster_store::{KubeStore, ResourceStore};
use crds::{ConditionReason, ModelDeployment, ModelDeploymentStatus};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::autoscaling::v1::HorizontalPodAutoscaler;
use k8s_openapi::api::core::v1::Service;
use kube::Client;
use tracing::error;

/// Why a reconciliation pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The object has never been fully provisioned.
    Create,
    /// The spec changed since the last successful pass.
    Update,
    /// The object is being removed.
    Delete,
    /// Nothing changed; verify the workload still matches the status.
    DriftCheck,
}

impl Trigger {
    /// Classifies a non-deleting pass from the recorded generation.
    ///
    /// A pass that failed does not record its generation, so the object is
    /// re-classified under the same trigger on the next attempt.
    pub fn classify(md: &ModelDeployment) -> Trigger {
        let observed = md.status.as_ref().and_then(|s| s.observed_generation);
        match observed {
            None => Trigger::Create,
            Some(g) if Some(g) != md.metadata.generation => Trigger::Update,
            Some(_) => Trigger::DriftCheck,
        }
    }
}

/// One store per child resource kind, all scoped to a single namespace.
pub struct ChildStores {
    pub workloads: Box<dyn ResourceStore<Deployment>>,
    pub services: Box<dyn ResourceStore<Service>>,
    pub autoscalers: Box<dyn ResourceStore<HorizontalPodAutoscaler>>,
}

impl ChildStores {
    /// Stores backed by the live cluster.
    pub fn kube(client: Client, namespace: &str) -> Self {
        Self {
            workloads: Box::new(KubeStore::namespaced(client.clone(), namespace)),
            services: Box::new(KubeStore::namespaced(client.clone(), namespace)),
            autoscalers: Box::new(KubeStore::namespaced(client, namespace)),
        }
    }
}

/// Outcome of one reconciliation pass.
///
/// The status is written even when the pass failed, so the object reflects
/// the failure instead of silently staying in its previous phase.
pub struct PassReport {
    pub status: Option<ModelDeploymentStatus>,
    pub result: Result<(), ControllerError>,
}

pub struct Reconciler {
    stores: ChildStores,
}

impl Reconciler {
    pub fn new(stores: ChildStores) -> Self {
        Self { stores }
    }

    /// Runs one pass under the given trigger.
    pub async fn run(&self, md: &ModelDeployment, trigger: Trigger) -> PassReport {
        match trigger {
            Trigger::Create => match self.create(md).await {
                Ok(s) => PassReport {
                    status: Some(s),
                    result: Ok(()),
                },
                Err(e) => {
                    error!("Failed to create resources: {e}");
                    PassReport {
                        status: Some(status::failed(
                            md,
                            ConditionReason::CreationFailed,
                            &format!("Failed to create resources: {e}"),
                        )),
                        result: Err(e),
                    }
                }
            },
            Trigger::Update => match self.update(md).await {
                Ok(s) => PassReport {
                    status: Some(s),
                    result: Ok(()),
                },
                Err(e) => {
                    error!("Failed to update resources: {e}");
                    PassReport {
                        status: Some(status::failed(
                            md,
                            ConditionReason::UpdateFailed,
                            &format!("Failed to update resources: {e}"),
                        )),
                        result: Err(e),
                    }
                }
            },
            Trigger::Delete => match self.delete(md).await {
                Ok(()) => PassReport {
                    status: None,
                    result: Ok(()),
                },
                Err(e) => {
                    error!("Failed to delete resources: {e}");
                    PassReport {
                        status: Some(status::failed(
                            md,
                            ConditionReason::DeletionFailed,
                            &format!("Failed to delete resources: {e}"),
                        )),
                        result: Err(e),
                    }
                }
            },
            Trigger::DriftCheck => match self.drift_check(md).await {
                Ok(status) => PassReport {
                    status,
                    result: Ok(()),
                },
                Err(e) => {
                    error!("Health check failed: {e}");
                    PassReport {
                        status: Some(status::failed(
                            md,
                            ConditionReason::HealthCheckFailed,
                            &format!("Health check failed: {e}"),
                        )),
                        result: Err(e),
                    }
                }
            },
        }
    }
}

/// Name and namespace of the object, required for any pass.
fn identity(md: &ModelDeployment) -> Result<(&str, &str), ControllerError> {
    let name = md
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| ControllerError::InvalidConfig("ModelDeployment missing name".into()))?;
    let namespace = md.metadata.namespace.as_deref().ok_or_else(|| {
        ControllerError::InvalidConfig("ModelDeployment missing namespace".into())
    })?;
    Ok((name, namespace))
}

#[cfg(test)]
mod create_test;
#[cfg(test)]
mod delete_test;
