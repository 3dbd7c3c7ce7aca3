//! Desired child-resource manifests.
//!
//! Pure, deterministic builders computing the desired shape of each child
//! resource from a `ModelDeploymentSpec`. No I/O lives here; every value is
//! a function of the spec alone, so any reconciliation pass can re-derive
//! identical manifests.

use crds::{ModelDeploymentSpec, autoscaler_name, service_name, workload_name};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::autoscaling::v1::{
    CrossVersionObjectReference, HorizontalPodAutoscaler, HorizontalPodAutoscalerSpec,
};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, HTTPGetAction, PodSpec, PodTemplateSpec, Probe,
    ResourceRequirements, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// Inference server container image.
pub const INFERENCE_IMAGE: &str = "ml-platform/inference-server:latest";

/// Port the inference server listens on.
pub const SERVING_PORT: i32 = 8001;

/// Model registry endpoint injected into the serving container.
pub const MODEL_REGISTRY_URL: &str = "http://model-registry-service:8000";

/// Value of the `managed-by` label on every child resource.
pub const MANAGED_BY: &str = "ml-operator";

const DEFAULT_REQUEST_CPU: &str = "250m";
const DEFAULT_REQUEST_MEMORY: &str = "256Mi";
const DEFAULT_LIMIT_CPU: &str = "500m";
const DEFAULT_LIMIT_MEMORY: &str = "512Mi";

const DEFAULT_MIN_REPLICAS: i32 = 1;
const DEFAULT_MAX_REPLICAS: i32 = 5;
const DEFAULT_TARGET_CPU_PERCENTAGE: i32 = 70;

/// Full label set carried on child resource metadata.
fn labels(spec: &ModelDeploymentSpec, name: &str) -> BTreeMap<String, String> {
    let mut labels = pod_labels(spec, name);
    labels.insert("managed-by".to_string(), MANAGED_BY.to_string());
    labels
}

/// Pod-template label set (everything except `managed-by`).
fn pod_labels(spec: &ModelDeploymentSpec, name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app".to_string(), workload_name(name)),
        ("component".to_string(), "inference-server".to_string()),
        ("model-name".to_string(), spec.model_name.clone()),
        ("model-version".to_string(), spec.model_version.to_string()),
        ("environment".to_string(), spec.environment.clone()),
    ])
}

fn quantities(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
    BTreeMap::from([
        ("cpu".to_string(), Quantity(cpu.to_string())),
        ("memory".to_string(), Quantity(memory.to_string())),
    ])
}

/// Container resources with per-field defaults for anything the spec omits.
fn resources(spec: &ModelDeploymentSpec) -> ResourceRequirements {
    let requests = spec.resources.as_ref().and_then(|r| r.requests.as_ref());
    let limits = spec.resources.as_ref().and_then(|r| r.limits.as_ref());
    ResourceRequirements {
        requests: Some(quantities(
            requests
                .and_then(|r| r.cpu.as_deref())
                .unwrap_or(DEFAULT_REQUEST_CPU),
            requests
                .and_then(|r| r.memory.as_deref())
                .unwrap_or(DEFAULT_REQUEST_MEMORY),
        )),
        limits: Some(quantities(
            limits
                .and_then(|r| r.cpu.as_deref())
                .unwrap_or(DEFAULT_LIMIT_CPU),
            limits
                .and_then(|r| r.memory.as_deref())
                .unwrap_or(DEFAULT_LIMIT_MEMORY),
        )),
        ..Default::default()
    }
}

fn env_var(name: &str, value: String) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value),
        ..Default::default()
    }
}

fn http_probe(initial_delay: i32, period: i32, timeout: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some("/health".to_string()),
            port: IntOrString::Int(SERVING_PORT),
            ..Default::default()
        }),
        initial_delay_seconds: Some(initial_delay),
        period_seconds: Some(period),
        timeout_seconds: Some(timeout),
        ..Default::default()
    }
}

/// Desired workload Deployment for the inference server.
pub fn workload(spec: &ModelDeploymentSpec, name: &str, namespace: &str) -> Deployment {
    let deployment_name = workload_name(name);
    let selector = BTreeMap::from([("app".to_string(), deployment_name.clone())]);

    Deployment {
        metadata: ObjectMeta {
            name: Some(deployment_name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels(spec, name)),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(spec.replicas),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels(spec, name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: "inference-server".to_string(),
                        image: Some(INFERENCE_IMAGE.to_string()),
                        // Local image only; never pulled from a registry
                        image_pull_policy: Some("Never".to_string()),
                        ports: Some(vec![ContainerPort {
                            container_port: SERVING_PORT,
                            name: Some("http".to_string()),
                            ..Default::default()
                        }]),
                        env: Some(vec![
                            env_var("MODEL_NAME", spec.model_name.clone()),
                            env_var("MODEL_VERSION", spec.model_version.to_string()),
                            env_var("MODEL_REGISTRY_URL", MODEL_REGISTRY_URL.to_string()),
                            env_var("INFERENCE_PORT", SERVING_PORT.to_string()),
                            env_var("ENVIRONMENT", spec.environment.clone()),
                        ]),
                        resources: Some(resources(spec)),
                        liveness_probe: Some(http_probe(30, 10, 5)),
                        readiness_probe: Some(http_probe(10, 5, 3)),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

/// Desired ClusterIP Service exposing the inference server.
pub fn service(spec: &ModelDeploymentSpec, name: &str, namespace: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(service_name(name)),
            namespace: Some(namespace.to_string()),
            labels: Some(labels(spec, name)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(BTreeMap::from([("app".to_string(), workload_name(name))])),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: SERVING_PORT,
                target_port: Some(IntOrString::Int(SERVING_PORT)),
                ..Default::default()
            }]),
            type_: Some("ClusterIP".to_string()),
            ..Default::default()
        }),
        status: None,
    }
}

/// Desired HorizontalPodAutoscaler, or `None` when autoscaling is disabled.
///
/// `None` means "ensure absence": the synchronizer deletes any existing
/// autoscaler for this deployment.
pub fn autoscaler(
    spec: &ModelDeploymentSpec,
    name: &str,
    namespace: &str,
) -> Option<HorizontalPodAutoscaler> {
    let autoscaling = spec.autoscaling.as_ref().filter(|a| a.enabled)?;

    Some(HorizontalPodAutoscaler {
        metadata: ObjectMeta {
            name: Some(autoscaler_name(name)),
            namespace: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([
                ("app".to_string(), workload_name(name)),
                ("component".to_string(), "inference-server".to_string()),
                ("managed-by".to_string(), MANAGED_BY.to_string()),
            ])),
            ..Default::default()
        },
        spec: Some(HorizontalPodAutoscalerSpec {
            scale_target_ref: CrossVersionObjectReference {
                api_version: Some("apps/v1".to_string()),
                kind: "Deployment".to_string(),
                name: workload_name(name),
            },
            min_replicas: Some(autoscaling.min_replicas.unwrap_or(DEFAULT_MIN_REPLICAS)),
            max_replicas: autoscaling.max_replicas.unwrap_or(DEFAULT_MAX_REPLICAS),
            target_cpu_utilization_percentage: Some(
                autoscaling
                    .target_cpu_utilization_percentage
                    .unwrap_or(DEFAULT_TARGET_CPU_PERCENTAGE),
            ),
        }),
        status: None,
    })
}

#[cfg(test)]
#[path = "manifests_test.rs"]
mod manifests_test;
