//! Interface order resolution.
//!
//! The control plane assigns every interface an `order` index at attach time
//! but does not guarantee that list responses come back in that order.
//! Dependent resources address interfaces positionally ("float the second
//! interface"), so reads resolve the canonical ordering here.

use strato_client::{InstanceApi, Interface};
use tracing::warn;

use crate::error::{Error, Result};

/// Fetch the interfaces of an instance and return their UUIDs sorted by the
/// server-assigned attach index.
pub async fn resolve_order<C: InstanceApi>(cloud: &C, instance_uuid: &str) -> Result<Vec<String>> {
    let interfaces = cloud
        .get_interfaces(instance_uuid)
        .await
        .map_err(|e| Error::remote("read", "instance", instance_uuid, e))?;
    Ok(sort_by_attach_order(interfaces))
}

/// Sort interfaces ascending by attach index and return their UUIDs.
///
/// Attach indices are unique per instance. If the control plane ever returns
/// duplicates, input order decides between them (the sort is stable) and a
/// warning is logged.
fn sort_by_attach_order(mut interfaces: Vec<Interface>) -> Vec<String> {
    interfaces.sort_by_key(|i| i.order);
    for pair in interfaces.windows(2) {
        if pair[0].order == pair[1].order {
            warn!(
                "Interfaces {} and {} share attach order {}",
                pair[0].uuid, pair[1].uuid, pair[0].order
            );
        }
    }
    interfaces.into_iter().map(|i| i.uuid).collect()
}
