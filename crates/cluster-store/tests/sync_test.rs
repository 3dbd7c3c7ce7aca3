//! Sync behavior tests against the in-memory mock store.

use cluster_store::{MockStore, ResourceStore, StoreError, SyncOutcome, sync};
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Store whose resource is deleted by an external actor between every read
/// and the following patch: get always succeeds, patch always reports the
/// resource gone. Creates land in the inner store.
struct RacingDeleteStore {
    created: MockStore<ConfigMap>,
}

#[async_trait::async_trait]
impl ResourceStore<ConfigMap> for RacingDeleteStore {
    async fn get(&self, name: &str) -> Result<ConfigMap, StoreError> {
        Ok(manifest(name))
    }

    async fn create(&self, desired: &ConfigMap) -> Result<ConfigMap, StoreError> {
        self.created.create(desired).await
    }

    async fn patch(&self, name: &str, _desired: &ConfigMap) -> Result<ConfigMap, StoreError> {
        Err(StoreError::NotFound(name.to_string()))
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.created.delete(name).await
    }
}

fn manifest(name: &str) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn creates_when_absent() {
    let store = MockStore::new();
    let desired = manifest("cfg");

    let outcome = sync(&store, "cfg", Some(&desired)).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Created);
    assert!(store.contains("cfg"));
}

#[tokio::test]
async fn patches_when_present() {
    let store = MockStore::new();
    store.insert("cfg", manifest("cfg"));

    let mut desired = manifest("cfg");
    desired.metadata.labels =
        Some([("app".to_string(), "cfg".to_string())].into_iter().collect());
    let outcome = sync(&store, "cfg", Some(&desired)).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Patched);
    assert!(store.stored("cfg").unwrap().metadata.labels.is_some());
}

#[tokio::test]
async fn deletes_when_undesired() {
    let store = MockStore::new();
    store.insert("cfg", manifest("cfg"));

    let outcome = sync(&store, "cfg", None).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Deleted);
    assert!(!store.contains("cfg"));
}

#[tokio::test]
async fn absent_and_undesired_is_noop() {
    let store: MockStore<ConfigMap> = MockStore::new();

    let outcome = sync(&store, "cfg", None).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Unchanged);
}

#[tokio::test]
async fn sync_is_idempotent() {
    let store = MockStore::new();
    let desired = manifest("cfg");

    let first = sync(&store, "cfg", Some(&desired)).await.unwrap();
    let second = sync(&store, "cfg", Some(&desired)).await.unwrap();

    assert_eq!(first, SyncOutcome::Created);
    assert_eq!(second, SyncOutcome::Patched);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn recreates_when_resource_vanishes_before_patch() {
    let store = RacingDeleteStore {
        created: MockStore::new(),
    };

    let desired = manifest("cfg");
    let outcome = sync(&store, "cfg", Some(&desired)).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Created);
    assert!(store.created.contains("cfg"));
}

#[tokio::test]
async fn vanish_before_patch_still_folds_the_create_race() {
    let store = RacingDeleteStore {
        created: MockStore::new(),
    };
    // A concurrent pass recreated the resource before our fallback create
    store.created.insert("cfg", manifest("cfg"));

    let desired = manifest("cfg");
    let outcome = sync(&store, "cfg", Some(&desired)).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Unchanged);
}

#[tokio::test]
async fn create_conflict_is_folded_into_success() {
    let store: MockStore<ConfigMap> = MockStore::new();
    store.fail_create_with(StoreError::Conflict("cfg".to_string()));

    let desired = manifest("cfg");
    let outcome = sync(&store, "cfg", Some(&desired)).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Unchanged);
}

#[tokio::test]
async fn propagates_non_folded_errors() {
    let store = MockStore::new();
    store.fail_with(StoreError::Api("quota exceeded".to_string()));

    let desired = manifest("cfg");
    let err = sync(&store, "cfg", Some(&desired)).await.unwrap_err();

    assert!(matches!(err, StoreError::Api(_)));
    store.clear_failure();
    assert!(sync(&store, "cfg", Some(&desired)).await.is_ok());
}
