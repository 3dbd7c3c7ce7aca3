//! Idempotent single-resource synchronization
//!
//! Drives one cluster resource toward a desired manifest, or toward absence
//! when no manifest is desired. This is the only place the NotFound/Conflict
//! folding rules live; every reconciliation trigger goes through it.

use crate::error::StoreError;
use crate::store_trait::ResourceStore;
use tracing::{debug, warn};

/// What `sync` did to converge the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The resource did not exist and was created
    Created,
    /// The resource existed and was patched with the desired manifest
    Patched,
    /// The resource existed and was deleted
    Deleted,
    /// Nothing to do (already absent, or another pass won a create race)
    Unchanged,
}

/// Makes the resource named `name` match `desired`.
///
/// - `Some(manifest)` + absent resource: create; a Conflict response means
///   another pass already created it and is folded into `Unchanged`.
/// - `Some(manifest)` + existing resource: patch unconditionally
///   (last-writer-wins, no generation conflict detection). NotFound from
///   the patch means the resource vanished after the read; the pass falls
///   back to creating it.
/// - `None` + existing resource: delete.
/// - `None` + absent resource: no-op. NotFound on the delete is likewise
///   folded in.
///
/// NotFound from read, patch, or delete is never an error here. Any other
/// error propagates unmodified; retry policy belongs to the caller's
/// requeue schedule, not here.
pub async fn sync<K>(
    store: &dyn ResourceStore<K>,
    name: &str,
    desired: Option<&K>,
) -> Result<SyncOutcome, StoreError> {
    match desired {
        Some(manifest) => match store.get(name).await {
            Ok(_) => match store.patch(name, manifest).await {
                Ok(_) => {
                    debug!("Patched {}", name);
                    Ok(SyncOutcome::Patched)
                }
                Err(StoreError::NotFound(_)) => {
                    // Deleted out from under us between the read and the
                    // patch; recreate instead.
                    warn!("{} vanished before patch, creating instead", name);
                    create(store, name, manifest).await
                }
                Err(e) => Err(e),
            },
            Err(StoreError::NotFound(_)) => create(store, name, manifest).await,
            Err(e) => Err(e),
        },
        None => match store.delete(name).await {
            Ok(()) => {
                debug!("Deleted {}", name);
                Ok(SyncOutcome::Deleted)
            }
            Err(StoreError::NotFound(_)) => Ok(SyncOutcome::Unchanged),
            Err(e) => Err(e),
        },
    }
}

async fn create<K>(
    store: &dyn ResourceStore<K>,
    name: &str,
    manifest: &K,
) -> Result<SyncOutcome, StoreError> {
    match store.create(manifest).await {
        Ok(_) => {
            debug!("Created {}", name);
            Ok(SyncOutcome::Created)
        }
        Err(StoreError::Conflict(_)) => {
            // Lost a create race to a concurrent pass; the resource
            // exists, which is what we wanted.
            warn!("{} already exists, treating create as success", name);
            Ok(SyncOutcome::Unchanged)
        }
        Err(e) => Err(e),
    }
}
