//! Cluster Resource Store
//!
//! A thin, typed get/create/patch/delete abstraction over the Kubernetes API
//! for the child resources a ModelDeployment manages, plus the idempotent
//! `sync` primitive that drives one resource kind toward a desired manifest
//! (or desired absence).
//!
//! # Example
//!
//! ```no_run
//! use cluster_store::{KubeStore, sync};
//! use k8s_openapi::api::apps::v1::Deployment;
//! use kube::{Api, Client};
//!
//! # async fn example(desired: Deployment) -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::try_default().await?;
//! let store = KubeStore::new(Api::<Deployment>::namespaced(client, "default"));
//!
//! // Create-or-patch toward the desired manifest
//! let outcome = sync(&store, "iris-inference", Some(&desired)).await?;
//!
//! // Ensure absence
//! sync(&store, "iris-inference", None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error taxonomy
//!
//! All store operations return [`StoreError`], collapsing the cluster's
//! responses into three statically checkable kinds: `NotFound`, `Conflict`,
//! and `Api` (everything else). `sync` folds the first two into its
//! idempotency logic; only `Api` errors ever propagate out of it.

pub mod client;
pub mod error;
pub mod mock;
#[path = "trait.rs"]
pub mod store_trait;
pub mod sync;

pub use client::KubeStore;
pub use error::StoreError;
pub use mock::MockStore;
pub use store_trait::ResourceStore;
pub use sync::{SyncOutcome, sync};
