//! ModelDeployment CRD
//!
//! Declares a desired deployment of a registered model version: an inference
//! workload, a service exposing it, and optionally a horizontal autoscaler.

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state for one model deployment.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "ml.example.com",
    version = "v1",
    kind = "ModelDeployment",
    plural = "modeldeployments",
    namespaced,
    status = "ModelDeploymentStatus",
    shortname = "md"
)]
#[serde(rename_all = "camelCase")]
pub struct ModelDeploymentSpec {
    /// Name of the model in the registry
    pub model_name: String,

    /// Model version to serve (>= 1)
    pub model_version: i64,

    /// Number of inference replicas
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Container resource requests/limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceSpec>,

    /// Deployment environment label (e.g. "development", "production")
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Horizontal autoscaling configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<AutoscalingSpec>,
}

/// Container resource requests and limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// Requested resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceList>,

    /// Resource limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceList>,
}

/// CPU/memory quantity pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    /// CPU quantity (e.g. "250m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    /// Memory quantity (e.g. "256Mi")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

/// Horizontal Pod Autoscaler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoscalingSpec {
    /// Whether an autoscaler should exist for this deployment
    #[serde(default)]
    pub enabled: bool,

    /// Minimum replicas (default 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<i32>,

    /// Maximum replicas (default 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replicas: Option<i32>,

    /// Target average CPU utilization percentage (default 70)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cpu_utilization_percentage: Option<i32>,
}

/// Observed state, written back exclusively by the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelDeploymentStatus {
    /// Deployment lifecycle phase
    #[serde(default)]
    pub phase: DeploymentPhase,

    /// Name of the managed workload Deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,

    /// Name of the managed Service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    /// Desired replica count last observed on the workload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Ready replica count last observed on the workload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_replicas: Option<i32>,

    /// Timestamp of the last status write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Conditions; a single `Ready` condition is maintained in place
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<DeploymentCondition>,

    /// Spec generation last successfully applied to the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Model version last successfully applied to the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_model_version: Option<i64>,
}

/// Lifecycle phase of a ModelDeployment.
///
/// `Failed` is never terminal: any later successful reconciliation pass
/// moves the phase back to `Running` or `Updating`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DeploymentPhase {
    /// Child resources not yet created
    #[default]
    Pending,

    /// All desired replicas are ready
    Running,

    /// Replicas are rolling toward the desired state
    Updating,

    /// The last reconciliation pass failed
    Failed,
}

/// A single status condition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCondition {
    /// Condition type; currently always "Ready"
    #[serde(rename = "type")]
    pub type_: String,

    /// "True" or "False"
    pub status: ConditionStatus,

    /// When the status value last flipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,

    /// Machine-readable cause
    pub reason: ConditionReason,

    /// Human-readable elaboration, may embed an underlying error
    pub message: String,
}

/// Condition status value, serialized as the Kubernetes-conventional
/// "True"/"False" strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    /// Condition holds
    True,
    /// Condition does not hold
    False,
}

/// Fixed reason tokens for the `Ready` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionReason {
    /// Child resources created successfully
    DeploymentCreated,
    /// Child resources updated successfully
    DeploymentUpdated,
    /// Periodic replica-readiness check
    HealthCheck,
    /// Creating child resources failed
    CreationFailed,
    /// Updating child resources failed
    UpdateFailed,
    /// Deleting child resources failed
    DeletionFailed,
    /// Reading workload health failed
    HealthCheckFailed,
}

/// The `type` value of the always-present readiness condition.
pub const READY_CONDITION: &str = "Ready";

fn default_replicas() -> i32 {
    1
}

fn default_environment() -> String {
    "development".to_string()
}

/// Workload Deployment name derived from the ModelDeployment name.
///
/// All child names are pure functions of the CR name so that every
/// reconciliation pass can re-derive them without stored state.
pub fn workload_name(name: &str) -> String {
    format!("{name}-inference")
}

/// Service name derived from the ModelDeployment name.
pub fn service_name(name: &str) -> String {
    format!("{name}-service")
}

/// HorizontalPodAutoscaler name derived from the ModelDeployment name.
pub fn autoscaler_name(name: &str) -> String {
    format!("{name}-hpa")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_defaults_applied_on_deserialize() {
        let spec: ModelDeploymentSpec =
            serde_json::from_value(serde_json::json!({
                "modelName": "iris",
                "modelVersion": 1
            }))
            .unwrap();
        assert_eq!(spec.replicas, 1);
        assert_eq!(spec.environment, "development");
        assert!(spec.resources.is_none());
        assert!(spec.autoscaling.is_none());
    }

    #[test]
    fn phase_serializes_pascal_case() {
        assert_eq!(
            serde_json::to_value(DeploymentPhase::Updating).unwrap(),
            serde_json::json!("Updating")
        );
        assert_eq!(
            serde_json::to_value(ConditionStatus::True).unwrap(),
            serde_json::json!("True")
        );
    }

    #[test]
    fn child_names_are_deterministic() {
        assert_eq!(workload_name("iris"), "iris-inference");
        assert_eq!(service_name("iris"), "iris-service");
        assert_eq!(autoscaler_name("iris"), "iris-hpa");
    }
}
