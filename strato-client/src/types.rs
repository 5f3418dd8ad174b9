//! Wire types for the Strato control plane API.

use serde::{Deserialize, Serialize};

/// Lifecycle state marking a resource as logically absent.
///
/// The control plane keeps tombstone records around after deletion; a record
/// carrying this state must be treated as non-existent.
pub const STATE_DELETED: &str = "deleted";

// =============================================================================
// Resource kinds
// =============================================================================

/// Resource kinds that carry a metadata map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Namespace,
    Network,
    Instance,
}

impl ResourceKind {
    /// Path segment used by the metadata endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Namespace => "namespace",
            ResourceKind::Network => "network",
            ResourceKind::Instance => "instance",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Network types
// =============================================================================

/// Network record returned by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub uuid: String,
    pub name: String,
    pub namespace: String,
    /// IPv4 CIDR the network hands addresses out of.
    pub netblock: String,
    pub provide_dhcp: bool,
    pub provide_nat: bool,
    pub state: String,
}

impl Network {
    /// Whether this record is a tombstone.
    pub fn is_deleted(&self) -> bool {
        self.state == STATE_DELETED
    }
}

// =============================================================================
// Instance types
// =============================================================================

/// Disk attached to an instance at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSpec {
    /// Disk size in GB.
    pub size_gb: u64,
    /// Base image reference (URL or image id), if any.
    pub base: Option<String>,
    /// Bus to attach with (e.g. `virtio`, `ide`), control plane default if unset.
    pub bus: Option<String>,
    /// `disk` or `cdrom`, control plane default if unset.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Video adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSpec {
    /// Adapter model, e.g. `cirrus` or `vga`.
    pub model: String,
    /// Video memory in KB.
    pub memory_kb: u64,
}

impl Default for VideoSpec {
    fn default() -> Self {
        Self {
            model: "cirrus".to_string(),
            memory_kb: 16384,
        }
    }
}

/// Network attachment requested for an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// UUID of the network to attach to.
    pub network_uuid: String,
    /// Fixed IPv4 address within the network, if requested.
    pub address: Option<String>,
    /// Fixed MAC address, if requested.
    pub mac: Option<String>,
    /// NIC model, control plane default if unset.
    pub model: Option<String>,
}

/// Instance record returned by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub uuid: String,
    pub name: String,
    pub namespace: String,
    pub cpus: u32,
    /// Memory in MB.
    pub memory_mb: u64,
    pub disks: Vec<DiskSpec>,
    pub video: VideoSpec,
    pub ssh_key: Option<String>,
    /// Cloud-init user data, base64 encoded.
    pub user_data: Option<String>,
    /// Hypervisor node the instance was placed on.
    pub node: String,
    pub console_port: u16,
    pub vdi_port: u16,
    pub state: String,
}

impl Instance {
    /// Whether this record is a tombstone.
    pub fn is_deleted(&self) -> bool {
        self.state == STATE_DELETED
    }
}

/// Network interface attached to an instance.
///
/// Interfaces are created by the control plane when an instance is created,
/// one per requested network attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    pub uuid: String,
    pub instance_uuid: String,
    pub network_uuid: String,
    /// Attach-order index assigned by the control plane, unique per instance.
    pub order: u32,
    pub mac: String,
    pub ipv4: Option<String>,
    pub model: String,
    /// Floating address routed to this interface, if any.
    pub floating: Option<String>,
}

impl Interface {
    /// The floating address routed to this interface, if any.
    ///
    /// Some control plane versions report "no floating address" as an empty
    /// string instead of omitting the field; both map to `None` here.
    pub fn floating_address(&self) -> Option<&str> {
        self.floating.as_deref().filter(|a| !a.is_empty())
    }
}
