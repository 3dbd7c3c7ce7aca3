//! Kubernetes resource watcher.
//!
//! Drives reconciliation of ModelDeployment objects using
//! kube_runtime::Controller. Deletion is handled through a finalizer so child
//! resources are torn down before the object disappears; every other event is
//! classified from the recorded generation and dispatched to the reconciler.

use crate::error::ControllerError;
use crate::reconciler::{ChildStores, PassReport, Reconciler, Trigger};
use crds::ModelDeployment;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use kube_runtime::controller::{Action, Config as ControllerConfig};
use kube_runtime::finalizer::{Event, finalizer};
use kube_runtime::{Controller, watcher};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use futures::StreamExt;
use tracing::{debug, error, info};

/// Finalizer that keeps a ModelDeployment around until its children are gone.
pub const FINALIZER: &str = "ml.example.com/model-deployment";

/// Shared state handed to every reconciliation invocation.
pub struct Context {
    pub client: Client,
    pub requeue_interval: Duration,
}

/// Watches ModelDeployment resources for changes.
pub struct Watcher {
    context: Arc<Context>,
    api: Api<ModelDeployment>,
}

impl Watcher {
    /// Creates a watcher scoped to `namespace`, or cluster-wide when `None`.
    pub fn new(context: Arc<Context>, namespace: Option<&str>) -> Self {
        let api = match namespace {
            Some(ns) => Api::namespaced(context.client.clone(), ns),
            None => Api::all(context.client.clone()),
        };
        Self { context, api }
    }

    /// Starts watching ModelDeployment resources. Runs until the process
    /// shuts down; watch failures are retried by the controller runtime.
    pub async fn watch_model_deployments(&self) -> Result<(), ControllerError> {
        info!("Starting ModelDeployment watcher");

        // Debounce batches bursts of events (spec edit plus our own status
        // write) into a single pass; concurrency bounds API load.
        let controller_config = ControllerConfig::default()
            .debounce(Duration::from_secs(5))
            .concurrency(3);

        Controller::new(self.api.clone(), watcher::Config::default())
            .with_config(controller_config)
            .run(reconcile, error_policy, self.context.clone())
            .for_each(|res| async move {
                if let Err(e) = res {
                    error!("Controller error for ModelDeployment: {e}");
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(
    md: Arc<ModelDeployment>,
    ctx: Arc<Context>,
) -> Result<Action, kube_runtime::finalizer::Error<ControllerError>> {
    let namespace = md.namespace().unwrap_or_else(|| "default".to_string());
    let api: Api<ModelDeployment> = Api::namespaced(ctx.client.clone(), &namespace);

    finalizer(&api, FINALIZER, md, |event| async move {
        match event {
            Event::Apply(md) => apply(&md, &ctx).await,
            Event::Cleanup(md) => cleanup(&md, &ctx).await,
        }
    })
    .await
}

/// Handles every non-deletion event: classifies the trigger, runs the pass
/// and writes the resulting status.
async fn apply(md: &ModelDeployment, ctx: &Context) -> Result<Action, ControllerError> {
    let name = md.name_any();
    let namespace = md.namespace().unwrap_or_else(|| "default".to_string());

    let trigger = Trigger::classify(md);
    debug!("Reconciling ModelDeployment {namespace}/{name} under {trigger:?}");

    let reconciler = Reconciler::new(ChildStores::kube(ctx.client.clone(), &namespace));
    let report = reconciler.run(md, trigger).await;
    write_status(md, ctx, &report).await?;
    report.result?;

    Ok(Action::requeue(ctx.requeue_interval))
}

/// Tears down child resources before the finalizer is removed. An error keeps
/// the finalizer in place and the deletion is retried; the failure is also
/// surfaced on the status while the object lingers.
async fn cleanup(md: &ModelDeployment, ctx: &Context) -> Result<Action, ControllerError> {
    let namespace = md.namespace().unwrap_or_else(|| "default".to_string());

    let reconciler = Reconciler::new(ChildStores::kube(ctx.client.clone(), &namespace));
    let report = reconciler.run(md, Trigger::Delete).await;
    write_status(md, ctx, &report).await?;
    report.result?;

    Ok(Action::await_change())
}

/// Patches the status subresource when the pass produced one. Runs for
/// failed passes too, so the Failed phase is visible on the object.
async fn write_status(
    md: &ModelDeployment,
    ctx: &Context,
    report: &PassReport,
) -> Result<(), ControllerError> {
    let Some(status) = &report.status else {
        return Ok(());
    };
    let name = md.name_any();
    let namespace = md.namespace().unwrap_or_else(|| "default".to_string());
    let api: Api<ModelDeployment> = Api::namespaced(ctx.client.clone(), &namespace);

    api.patch_status(
        &name,
        &PatchParams::default(),
        &Patch::Merge(&json!({ "status": status })),
    )
    .await?;
    Ok(())
}

fn error_policy(
    md: Arc<ModelDeployment>,
    error: &kube_runtime::finalizer::Error<ControllerError>,
    _ctx: Arc<Context>,
) -> Action {
    error!(
        "Reconciliation error for ModelDeployment {}: {error}",
        md.name_any()
    );
    Action::requeue(Duration::from_secs(60))
}
