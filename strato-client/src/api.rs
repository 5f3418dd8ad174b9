//! Control plane API trait definitions.
//!
//! These traits abstract away the transport, allowing resource handlers to
//! work with domain operations instead of HTTP calls. They are split per
//! resource domain and recombined into [`ControlPlane`], the composite trait
//! the handlers are generic over.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    DiskSpec, Instance, Interface, Network, NetworkAttachment, ResourceKind, VideoSpec,
};

// =============================================================================
// Request DTOs
// =============================================================================

/// Request to create a new network.
#[derive(Debug, Clone)]
pub struct CreateNetworkRequest {
    pub name: String,
    /// IPv4 CIDR the network hands addresses out of.
    pub netblock: String,
    pub provide_dhcp: bool,
    pub provide_nat: bool,
}

/// Request to create a new instance.
#[derive(Debug, Clone)]
pub struct InstanceCreateRequest {
    pub name: String,
    pub cpus: u32,
    /// Memory in MB.
    pub memory_mb: u64,
    pub disks: Vec<DiskSpec>,
    pub video: VideoSpec,
    /// Networks to attach, in declaration order.
    pub networks: Vec<NetworkAttachment>,
    pub ssh_key: Option<String>,
    /// Cloud-init user data, base64 encoded.
    pub user_data: Option<String>,
}

// =============================================================================
// Domain API traits
// =============================================================================

/// Namespace and access key operations.
#[async_trait]
pub trait NamespaceApi: Send + Sync {
    /// List all namespace names visible to the caller.
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    /// Create a new namespace.
    async fn create_namespace(&self, name: &str) -> Result<()>;

    /// Delete a namespace.
    async fn delete_namespace(&self, name: &str) -> Result<()>;

    /// List the key names registered in a namespace.
    async fn list_keys(&self, namespace: &str) -> Result<Vec<String>>;

    /// Register a new access key in a namespace.
    async fn create_key(&self, namespace: &str, keyname: &str, secret: &str) -> Result<()>;

    /// Replace the secret of an existing access key.
    async fn update_key(&self, namespace: &str, keyname: &str, secret: &str) -> Result<()>;

    /// Remove an access key from a namespace.
    async fn delete_key(&self, namespace: &str, keyname: &str) -> Result<()>;
}

/// Network operations.
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Create a new virtual network.
    async fn create_network(&self, req: CreateNetworkRequest) -> Result<Network>;

    /// Get a network by UUID.
    async fn get_network(&self, uuid: &str) -> Result<Network>;

    /// Delete a network.
    async fn delete_network(&self, uuid: &str) -> Result<()>;
}

/// Instance operations.
#[async_trait]
pub trait InstanceApi: Send + Sync {
    /// Create and start a new instance.
    async fn create_instance(&self, req: InstanceCreateRequest) -> Result<Instance>;

    /// Get an instance by UUID.
    async fn get_instance(&self, uuid: &str) -> Result<Instance>;

    /// Delete an instance.
    async fn delete_instance(&self, uuid: &str) -> Result<()>;

    /// List the network interfaces attached to an instance.
    ///
    /// No response ordering is guaranteed; callers order by
    /// [`Interface::order`] when position matters.
    async fn get_interfaces(&self, instance_uuid: &str) -> Result<Vec<Interface>>;
}

/// Metadata operations, generic over the owning resource kind.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Fetch the full metadata map of a resource.
    async fn get_metadata(&self, kind: ResourceKind, id: &str) -> Result<HashMap<String, String>>;

    /// Set one metadata key, creating or replacing it.
    async fn set_metadata(
        &self,
        kind: ResourceKind,
        id: &str,
        key: &str,
        value: &str,
    ) -> Result<()>;

    /// Delete one metadata key.
    async fn delete_metadata(&self, kind: ResourceKind, id: &str, key: &str) -> Result<()>;
}

/// Floating address operations on interfaces.
#[async_trait]
pub trait FloatingApi: Send + Sync {
    /// Get a single interface by UUID.
    async fn get_interface(&self, uuid: &str) -> Result<Interface>;

    /// Route a floating address to an interface. The control plane picks the
    /// address from its floating pool.
    async fn attach_floating(&self, interface_uuid: &str) -> Result<()>;

    /// Remove the floating address routed to an interface.
    async fn detach_floating(&self, interface_uuid: &str) -> Result<()>;
}

// =============================================================================
// Composite trait
// =============================================================================

/// Composite control plane trait combining all domains.
///
/// Resource handlers take this as their only collaborator; a transport
/// implementation (or a test fake) implements the domain traits and gets
/// `ControlPlane` for free via the blanket impl.
pub trait ControlPlane:
    NamespaceApi + NetworkApi + InstanceApi + MetadataApi + FloatingApi + Send + Sync
{
}

impl<T> ControlPlane for T where
    T: NamespaceApi + NetworkApi + InstanceApi + MetadataApi + FloatingApi + Send + Sync
{
}
