//! Instance lifecycle handler.
//!
//! Instances are the most involved resource: creation validates the whole
//! declaration up front, and read-back resolves the canonical interface
//! ordering so dependent resources (floating IPs) can reference interfaces
//! by position.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strato_client::{
    ControlPlane, DiskSpec, InstanceCreateRequest, NetworkAttachment, ResourceKind, VideoSpec,
};
use tracing::info;

use super::Lifecycle;
use crate::error::{Error, InvariantViolation, Result, ValidationError};
use crate::interfaces;
use crate::metadata;
use crate::validate;

/// Declared state of an instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceSpec {
    pub name: String,
    pub cpus: u32,
    /// Memory in MB.
    pub memory_mb: u64,
    pub disks: Vec<DiskSpec>,
    pub video: VideoSpec,
    /// Networks to attach, in order. Interface positions follow this order.
    pub networks: Vec<NetworkAttachment>,
    pub ssh_key: Option<String>,
    /// Cloud-init user data, base64 encoded.
    pub user_data: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// Control plane view of an instance.
#[derive(Debug, Clone)]
pub struct ObservedInstance {
    pub uuid: String,
    pub name: String,
    pub cpus: u32,
    pub memory_mb: u64,
    /// Hypervisor node the instance was placed on.
    pub node: String,
    pub console_port: u16,
    pub vdi_port: u16,
    pub state: String,
    /// Interface UUIDs ordered by attach index.
    pub interfaces: Vec<String>,
    pub metadata: HashMap<String, String>,
}

pub struct InstanceHandler<C: ControlPlane> {
    cloud: Arc<C>,
}

impl<C: ControlPlane> InstanceHandler<C> {
    pub fn new(cloud: Arc<C>) -> Self {
        Self { cloud }
    }
}

#[async_trait]
impl<C: ControlPlane> Lifecycle for InstanceHandler<C> {
    type Spec = InstanceSpec;
    type Observed = ObservedInstance;

    async fn exists(&self, id: &str) -> Result<bool> {
        match self.cloud.get_instance(id).await {
            Ok(instance) => Ok(!instance.is_deleted()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(Error::remote("exists", "instance", id, e)),
        }
    }

    async fn create(&self, spec: &Self::Spec) -> Result<String> {
        validate::validate_instance(spec)?;
        info!(
            "Creating instance {} ({} cpus, {} MB)",
            spec.name, spec.cpus, spec.memory_mb
        );
        let req = InstanceCreateRequest {
            name: spec.name.clone(),
            cpus: spec.cpus,
            memory_mb: spec.memory_mb,
            disks: spec.disks.clone(),
            video: spec.video.clone(),
            networks: spec.networks.clone(),
            ssh_key: spec.ssh_key.clone(),
            user_data: spec.user_data.clone(),
        };
        let instance = self
            .cloud
            .create_instance(req)
            .await
            .map_err(|e| Error::remote("create", "instance", &spec.name, e))?;
        // A server-side fault can produce a record with a blank UUID; binding
        // it would orphan the resource.
        if instance.uuid.is_empty() {
            return Err(InvariantViolation::EmptyIdentifier {
                resource: "instance",
            }
            .into());
        }
        metadata::apply(
            self.cloud.as_ref(),
            ResourceKind::Instance,
            &instance.uuid,
            &spec.metadata,
        )
        .await?;
        Ok(instance.uuid)
    }

    async fn read(&self, id: &str) -> Result<Self::Observed> {
        let instance = self
            .cloud
            .get_instance(id)
            .await
            .map_err(|e| Error::remote("read", "instance", id, e))?;
        if instance.is_deleted() {
            return Err(Error::NotFound {
                op: "read",
                resource: "instance",
                id: id.to_string(),
            });
        }
        let interfaces = interfaces::resolve_order(self.cloud.as_ref(), id).await?;
        let metadata = self
            .cloud
            .get_metadata(ResourceKind::Instance, id)
            .await
            .map_err(|e| Error::remote("read", "instance", id, e))?;
        Ok(ObservedInstance {
            uuid: instance.uuid,
            name: instance.name,
            cpus: instance.cpus,
            memory_mb: instance.memory_mb,
            node: instance.node,
            console_port: instance.console_port,
            vdi_port: instance.vdi_port,
            state: instance.state,
            interfaces,
            metadata,
        })
    }

    async fn update(&self, id: &str, previous: &Self::Spec, desired: &Self::Spec) -> Result<()> {
        // Everything except metadata is fixed at creation.
        let force_new = [
            ("name", previous.name != desired.name),
            ("cpus", previous.cpus != desired.cpus),
            ("memory_mb", previous.memory_mb != desired.memory_mb),
            ("disks", previous.disks != desired.disks),
            ("video", previous.video != desired.video),
            ("networks", previous.networks != desired.networks),
            ("ssh_key", previous.ssh_key != desired.ssh_key),
            ("user_data", previous.user_data != desired.user_data),
        ];
        if let Some((field, _)) = force_new.iter().copied().find(|(_, changed)| *changed) {
            return Err(ValidationError::ImmutableChange {
                resource: "instance",
                field,
            }
            .into());
        }
        metadata::reconcile(
            self.cloud.as_ref(),
            ResourceKind::Instance,
            id,
            &previous.metadata,
            &desired.metadata,
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        info!("Deleting instance {}", id);
        match self.cloud.delete_instance(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::remote("delete", "instance", id, e)),
        }
    }
}
