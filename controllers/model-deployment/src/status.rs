//! Builders for the `status` subresource of a ModelDeployment.
//!
//! Every reconciliation pass ends with exactly one status write, and these
//! builders produce the full object for it. They never talk to the cluster;
//! the watcher owns the actual patch.

use chrono::Utc;
use crds::{
    ConditionReason, ConditionStatus, DeploymentCondition, DeploymentPhase, ModelDeployment,
    ModelDeploymentStatus, READY_CONDITION, service_name, workload_name,
};

/// Status after all child resources were provisioned for a new object.
pub fn created(md: &ModelDeployment) -> ModelDeploymentStatus {
    provisioned(
        md,
        ConditionReason::DeploymentCreated,
        "ModelDeployment resources created successfully",
    )
}

/// Status after child resources were brought in line with a changed spec.
pub fn updated(md: &ModelDeployment) -> ModelDeploymentStatus {
    provisioned(
        md,
        ConditionReason::DeploymentUpdated,
        "ModelDeployment updated successfully",
    )
}

fn provisioned(
    md: &ModelDeployment,
    reason: ConditionReason,
    message: &str,
) -> ModelDeploymentStatus {
    let name = md.metadata.name.as_deref().unwrap_or_default();
    let mut status = md.status.clone().unwrap_or_default();
    status.phase = DeploymentPhase::Running;
    status.deployment_name = Some(workload_name(name));
    status.service_name = Some(service_name(name));
    status.replicas = Some(md.spec.replicas);
    status.last_updated = Some(Utc::now());
    // Recorded only on success so a failed pass is retried under the
    // same trigger instead of being classified as already applied.
    status.observed_generation = md.metadata.generation;
    status.observed_model_version = Some(md.spec.model_version);
    upsert_ready(
        &mut status.conditions,
        ConditionStatus::True,
        reason,
        message,
    );
    status
}

/// Status for a pass that hit an error. Prior identity fields are kept so a
/// transient failure does not blank out the recorded child names.
pub fn failed(
    md: &ModelDeployment,
    reason: ConditionReason,
    message: &str,
) -> ModelDeploymentStatus {
    let mut status = md.status.clone().unwrap_or_default();
    status.phase = DeploymentPhase::Failed;
    status.last_updated = Some(Utc::now());
    upsert_ready(
        &mut status.conditions,
        ConditionStatus::False,
        reason,
        message,
    );
    status
}

/// Status from a periodic health check of the workload.
pub fn health(
    md: &ModelDeployment,
    phase: DeploymentPhase,
    desired: i32,
    ready: i32,
) -> ModelDeploymentStatus {
    let mut status = md.status.clone().unwrap_or_default();
    status.phase = phase;
    status.replicas = Some(desired);
    status.ready_replicas = Some(ready);
    status.last_updated = Some(Utc::now());
    let condition_status = if phase == DeploymentPhase::Running {
        ConditionStatus::True
    } else {
        ConditionStatus::False
    };
    upsert_ready(
        &mut status.conditions,
        condition_status,
        ConditionReason::HealthCheck,
        &format!("{ready}/{desired} replicas ready"),
    );
    status
}

/// Updates the `Ready` condition in place. `lastTransitionTime` only moves
/// when the condition status actually flips.
pub fn upsert_ready(
    conditions: &mut Vec<DeploymentCondition>,
    status: ConditionStatus,
    reason: ConditionReason,
    message: &str,
) {
    let now = Utc::now();
    match conditions
        .iter_mut()
        .find(|c| c.type_ == READY_CONDITION)
    {
        Some(existing) => {
            if existing.status != status {
                existing.last_transition_time = Some(now);
            }
            existing.status = status;
            existing.reason = reason;
            existing.message = message.to_string();
        }
        None => conditions.push(DeploymentCondition {
            type_: READY_CONDITION.to_string(),
            status,
            last_transition_time: Some(now),
            reason,
            message: message.to_string(),
        }),
    }
}

/// Whether a health check result differs from what the status already says.
/// Unchanged results skip the write to keep drift checks read-only.
pub fn phase_or_ready_changed(
    current: Option<&ModelDeploymentStatus>,
    phase: DeploymentPhase,
    ready: i32,
) -> bool {
    current.map(|s| s.phase) != Some(phase)
        || current.and_then(|s| s.ready_replicas) != Some(ready)
}

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;
