//! Metadata reconciliation.
//!
//! The control plane exposes metadata as per-key set/delete calls, so
//! converging on a desired map means applying a minimal diff: set keys that
//! are new or changed, delete keys that were dropped, leave the rest alone.

use std::collections::HashMap;

use strato_client::{MetadataApi, ResourceKind};
use tracing::debug;

use crate::error::{Error, Result};

/// Apply a desired metadata map to a freshly created resource.
pub async fn apply<C: MetadataApi>(
    cloud: &C,
    kind: ResourceKind,
    id: &str,
    desired: &HashMap<String, String>,
) -> Result<()> {
    reconcile(cloud, kind, id, &HashMap::new(), desired).await
}

/// Converge the remote metadata map from `previous` to `desired`.
///
/// Calls are issued one at a time. The first failure aborts reconciliation:
/// keys already written stay written, keys after the failure are never
/// touched, and the error names the key that failed so the caller can
/// re-reconcile later.
pub async fn reconcile<C: MetadataApi>(
    cloud: &C,
    kind: ResourceKind,
    id: &str,
    previous: &HashMap<String, String>,
    desired: &HashMap<String, String>,
) -> Result<()> {
    for (key, value) in desired {
        if previous.get(key) == Some(value) {
            continue;
        }
        debug!(kind = %kind, id, key, "Setting metadata");
        cloud
            .set_metadata(kind, id, key, value)
            .await
            .map_err(|e| Error::Metadata {
                kind,
                id: id.to_string(),
                key: key.clone(),
                source: e,
            })?;
    }

    for key in previous.keys() {
        if desired.contains_key(key) {
            continue;
        }
        debug!(kind = %kind, id, key, "Deleting metadata");
        cloud
            .delete_metadata(kind, id, key)
            .await
            .map_err(|e| Error::Metadata {
                kind,
                id: id.to_string(),
                key: key.clone(),
                source: e,
            })?;
    }

    Ok(())
}
