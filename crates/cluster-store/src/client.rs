//! Kubernetes-backed resource store

use crate::error::StoreError;
use crate::store_trait::ResourceStore;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, Patch, PatchParams, PostParams};
use kube::{Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// [`ResourceStore`] implementation backed by a namespaced [`kube::Api`].
///
/// Maps the cluster's error responses into the [`StoreError`] taxonomy once,
/// so callers never inspect HTTP status codes.
#[derive(Debug, Clone)]
pub struct KubeStore<K> {
    api: Api<K>,
}

impl<K> KubeStore<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    K::DynamicType: Default,
{
    /// Wraps an existing API handle.
    pub fn new(api: Api<K>) -> Self {
        Self { api }
    }

    /// Creates a store scoped to `namespace`.
    pub fn namespaced(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
        }
    }
}

#[async_trait::async_trait]
impl<K> ResourceStore<K> for KubeStore<K>
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync,
    K::DynamicType: Default,
{
    async fn get(&self, name: &str) -> Result<K, StoreError> {
        Ok(self.api.get(name).await?)
    }

    async fn create(&self, manifest: &K) -> Result<K, StoreError> {
        Ok(self.api.create(&PostParams::default(), manifest).await?)
    }

    async fn patch(&self, name: &str, manifest: &K) -> Result<K, StoreError> {
        Ok(self
            .api
            .patch(name, &PatchParams::default(), &Patch::Merge(manifest))
            .await?)
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.api.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}
