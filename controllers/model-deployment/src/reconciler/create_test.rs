use super::Trigger;
use crate::test_utils::{harness, model_deployment};
use cluster_store::StoreError;
use crds::{AutoscalingSpec, ConditionReason, ConditionStatus, DeploymentPhase};

#[tokio::test]
async fn create_provisions_all_children() {
    let h = harness();
    let mut md = model_deployment("iris", 2);
    md.spec.autoscaling = Some(AutoscalingSpec {
        enabled: true,
        ..Default::default()
    });

    let report = h.reconciler.run(&md, Trigger::Create).await;

    assert!(report.result.is_ok());
    assert!(h.workloads.contains("iris-inference"));
    assert!(h.services.contains("iris-service"));
    assert!(h.autoscalers.contains("iris-hpa"));

    let status = report.status.expect("status expected");
    assert_eq!(status.phase, DeploymentPhase::Running);
    assert_eq!(status.deployment_name.as_deref(), Some("iris-inference"));
    assert_eq!(status.observed_generation, Some(1));
}

#[tokio::test]
async fn create_skips_autoscaler_when_disabled() {
    let h = harness();
    let md = model_deployment("iris", 1);

    let report = h.reconciler.run(&md, Trigger::Create).await;

    assert!(report.result.is_ok());
    assert!(h.workloads.contains("iris-inference"));
    assert!(h.autoscalers.is_empty());
}

#[tokio::test]
async fn create_is_idempotent() {
    let h = harness();
    let md = model_deployment("iris", 1);

    let first = h.reconciler.run(&md, Trigger::Create).await;
    let second = h.reconciler.run(&md, Trigger::Create).await;

    assert!(first.result.is_ok());
    assert!(second.result.is_ok());
    assert_eq!(h.workloads.len(), 1);
    assert_eq!(h.services.len(), 1);
}

#[tokio::test]
async fn create_halts_on_first_failure() {
    let h = harness();
    let md = model_deployment("iris", 1);
    h.services.fail_with(StoreError::Api("server error".to_string()));

    let report = h.reconciler.run(&md, Trigger::Create).await;

    assert!(report.result.is_err());
    // The workload sync ran before the failing service sync
    assert!(h.workloads.contains("iris-inference"));
    assert!(h.services.is_empty());

    let status = report.status.expect("status expected");
    assert_eq!(status.phase, DeploymentPhase::Failed);
    let cond = &status.conditions[0];
    assert_eq!(cond.status, ConditionStatus::False);
    assert_eq!(cond.reason, ConditionReason::CreationFailed);
    assert!(cond.message.starts_with("Failed to create resources:"));
    // A failed pass leaves observedGeneration unset so it re-runs as Create
    assert_eq!(status.observed_generation, None);
}

#[tokio::test]
async fn create_race_losing_to_existing_child_still_succeeds() {
    let h = harness();
    let md = model_deployment("iris", 1);
    h.workloads
        .fail_create_with(StoreError::Conflict("iris-inference".to_string()));

    let report = h.reconciler.run(&md, Trigger::Create).await;

    assert!(report.result.is_ok());
    assert!(h.services.contains("iris-service"));
}
