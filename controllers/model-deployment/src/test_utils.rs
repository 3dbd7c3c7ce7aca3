//! Shared helpers for reconciler and status tests.

use crate::reconciler::{ChildStores, Reconciler};
use cluster_store::MockStore;
use crds::{ModelDeployment, ModelDeploymentSpec};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::autoscaling::v1::HorizontalPodAutoscaler;
use k8s_openapi::api::core::v1::Service;
use kube::api::ObjectMeta;

/// A ModelDeployment as the watcher would hand it to the reconciler.
pub fn model_deployment(name: &str, replicas: i32) -> ModelDeployment {
    let mut md = ModelDeployment::new(
        name,
        ModelDeploymentSpec {
            model_name: name.to_string(),
            model_version: 1,
            replicas,
            resources: None,
            environment: "development".to_string(),
            autoscaling: None,
        },
    );
    md.metadata = ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some("default".to_string()),
        generation: Some(1),
        ..ObjectMeta::default()
    };
    md
}

/// Mock-backed reconciler plus handles to its child stores.
pub struct Harness {
    pub reconciler: Reconciler,
    pub workloads: MockStore<Deployment>,
    pub services: MockStore<Service>,
    pub autoscalers: MockStore<HorizontalPodAutoscaler>,
}

pub fn harness() -> Harness {
    let workloads = MockStore::new();
    let services = MockStore::new();
    let autoscalers = MockStore::new();
    let stores = ChildStores {
        workloads: Box::new(workloads.clone()),
        services: Box::new(services.clone()),
        autoscalers: Box::new(autoscalers.clone()),
    };
    Harness {
        reconciler: Reconciler::new(stores),
        workloads,
        services,
        autoscalers,
    }
}
