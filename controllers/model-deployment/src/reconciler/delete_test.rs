use super::Trigger;
use crate::test_utils::{harness, model_deployment};
use cluster_store::{ResourceStore, StoreError};
use crds::{AutoscalingSpec, ConditionReason, ConditionStatus, DeploymentPhase};

#[tokio::test]
async fn delete_removes_all_children() {
    let h = harness();
    let mut md = model_deployment("iris", 1);
    md.spec.autoscaling = Some(AutoscalingSpec {
        enabled: true,
        ..Default::default()
    });
    h.reconciler.run(&md, Trigger::Create).await;

    let report = h.reconciler.run(&md, Trigger::Delete).await;

    assert!(report.result.is_ok());
    assert!(report.status.is_none());
    assert!(h.workloads.is_empty());
    assert!(h.services.is_empty());
    assert!(h.autoscalers.is_empty());
}

#[tokio::test]
async fn delete_tolerates_already_missing_children() {
    let h = harness();
    let md = model_deployment("iris", 1);
    // Only the service exists; workload and autoscaler are already gone
    h.reconciler.run(&md, Trigger::Create).await;
    h.workloads.delete("iris-inference").await.unwrap();

    let report = h.reconciler.run(&md, Trigger::Delete).await;

    assert!(report.result.is_ok());
    assert!(h.services.is_empty());
}

#[tokio::test]
async fn delete_of_nothing_succeeds() {
    let h = harness();
    let md = model_deployment("iris", 1);

    let report = h.reconciler.run(&md, Trigger::Delete).await;

    assert!(report.result.is_ok());
}

#[tokio::test]
async fn delete_continues_past_a_failure_and_keeps_first_error() {
    let h = harness();
    let mut md = model_deployment("iris", 1);
    md.spec.autoscaling = Some(AutoscalingSpec {
        enabled: true,
        ..Default::default()
    });
    h.reconciler.run(&md, Trigger::Create).await;
    h.workloads.fail_with(StoreError::Api("workload api down".to_string()));

    let report = h.reconciler.run(&md, Trigger::Delete).await;

    let err = report.result.expect_err("delete should surface the failure");
    assert!(err.to_string().contains("workload api down"));
    // The other kinds were still deleted
    assert!(h.services.is_empty());
    assert!(h.autoscalers.is_empty());
}

#[tokio::test]
async fn failed_delete_reports_failed_phase() {
    let h = harness();
    let md = model_deployment("iris", 1);
    h.reconciler.run(&md, Trigger::Create).await;
    h.services.fail_with(StoreError::Api("service api down".to_string()));

    let report = h.reconciler.run(&md, Trigger::Delete).await;

    assert!(report.result.is_err());
    let status = report.status.expect("failed delete should surface a status");
    assert_eq!(status.phase, DeploymentPhase::Failed);
    let cond = &status.conditions[0];
    assert_eq!(cond.status, ConditionStatus::False);
    assert_eq!(cond.reason, ConditionReason::DeletionFailed);
    assert!(cond.message.starts_with("Failed to delete resources:"));
}
