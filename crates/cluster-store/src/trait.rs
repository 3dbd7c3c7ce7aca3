//! ResourceStore trait for mocking
//!
//! Abstracts the cluster API for one resource kind in one namespace so that
//! reconciliation logic can be unit-tested against an in-memory store.

use crate::error::StoreError;

/// Get/create/patch/delete primitives for one resource kind.
///
/// A store instance is scoped to a single namespace at construction time;
/// resources are addressed by name only. All methods must be `Send` to work
/// with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ResourceStore<K>: Send + Sync {
    /// Fetch the resource by name.
    async fn get(&self, name: &str) -> Result<K, StoreError>;

    /// Create the resource from a full manifest.
    async fn create(&self, manifest: &K) -> Result<K, StoreError>;

    /// Patch the existing resource with a full desired manifest
    /// (last-writer-wins).
    async fn patch(&self, name: &str, manifest: &K) -> Result<K, StoreError>;

    /// Delete the resource by name.
    async fn delete(&self, name: &str) -> Result<(), StoreError>;
}
