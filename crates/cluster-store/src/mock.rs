//! Mock resource store for unit testing
//!
//! In-memory [`ResourceStore`] implementation so reconciliation logic can be
//! tested without a cluster. Resources are keyed by metadata name; a
//! configurable failure can be injected to exercise error-propagation paths.

use crate::error::StoreError;
use crate::store_trait::ResourceStore;
use kube::Resource;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory store for one resource kind.
///
/// Cloning shares the underlying storage, so tests can keep a handle while
/// handing a boxed clone to the code under test.
#[derive(Debug, Clone)]
pub struct MockStore<K> {
    objects: Arc<Mutex<HashMap<String, K>>>,
    fail_with: Arc<Mutex<Option<StoreError>>>,
    fail_create_with: Arc<Mutex<Option<StoreError>>>,
}

impl<K: Clone> MockStore<K> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_with: Arc::new(Mutex::new(None)),
            fail_create_with: Arc::new(Mutex::new(None)),
        }
    }

    /// Seeds a resource under `name` (for test setup).
    pub fn insert(&self, name: &str, object: K) {
        self.objects.lock().unwrap().insert(name.to_string(), object);
    }

    /// Returns a stored resource, if present.
    pub fn stored(&self, name: &str) -> Option<K> {
        self.objects.lock().unwrap().get(name).cloned()
    }

    /// Whether a resource is currently stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.objects.lock().unwrap().contains_key(name)
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every subsequent operation return `err` until
    /// [`clear_failure`](Self::clear_failure) is called.
    pub fn fail_with(&self, err: StoreError) {
        *self.fail_with.lock().unwrap() = Some(err);
    }

    /// Makes only `create` return `err`; other operations behave normally.
    /// Lets tests simulate losing a create race (get says absent, create
    /// says conflict).
    pub fn fail_create_with(&self, err: StoreError) {
        *self.fail_create_with.lock().unwrap() = Some(err);
    }

    /// Clears any injected failures.
    pub fn clear_failure(&self) {
        *self.fail_with.lock().unwrap() = None;
        *self.fail_create_with.lock().unwrap() = None;
    }

    fn injected_failure(&self) -> Option<StoreError> {
        self.fail_with.lock().unwrap().clone()
    }
}

impl<K: Clone> Default for MockStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<K> ResourceStore<K> for MockStore<K>
where
    K: Resource + Clone + Send + Sync,
{
    async fn get(&self, name: &str) -> Result<K, StoreError> {
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        self.stored(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn create(&self, manifest: &K) -> Result<K, StoreError> {
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        if let Some(err) = self.fail_create_with.lock().unwrap().clone() {
            return Err(err);
        }
        let name = manifest.meta().name.clone().unwrap_or_default();
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&name) {
            return Err(StoreError::Conflict(name));
        }
        objects.insert(name, manifest.clone());
        Ok(manifest.clone())
    }

    async fn patch(&self, name: &str, manifest: &K) -> Result<K, StoreError> {
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        let mut objects = self.objects.lock().unwrap();
        if !objects.contains_key(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        objects.insert(name.to_string(), manifest.clone());
        Ok(manifest.clone())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        if let Some(err) = self.injected_failure() {
            return Err(err);
        }
        self.objects
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
