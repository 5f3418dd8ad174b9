//! Provider error types.

use strato_client::{ClientError, ResourceKind};
use thiserror::Error;

/// Errors from resource lifecycle operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Declared input rejected before any control plane call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The resource was expected to exist but the control plane reports it
    /// absent (including tombstoned records).
    #[error("{op} {resource} {id}: not found")]
    NotFound {
        op: &'static str,
        resource: &'static str,
        id: String,
    },

    /// A control plane call failed.
    #[error("{op} {resource} {id}: {source}")]
    Remote {
        op: &'static str,
        resource: &'static str,
        id: String,
        #[source]
        source: ClientError,
    },

    /// Metadata reconciliation aborted at a key. Calls before the failing one
    /// have already taken effect, so the remote map is a partial merge until
    /// the next reconciliation.
    #[error("metadata update on {kind} {id} failed at key {key:?}: {source}")]
    Metadata {
        kind: ResourceKind,
        id: String,
        key: String,
        #[source]
        source: ClientError,
    },

    /// The control plane broke a contract the handlers rely on.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl Error {
    /// Wrap a client error with operation context, turning remote absence
    /// into [`Error::NotFound`].
    pub(crate) fn remote(
        op: &'static str,
        resource: &'static str,
        id: &str,
        source: ClientError,
    ) -> Self {
        if source.is_not_found() {
            Error::NotFound {
                op,
                resource,
                id: id.to_string(),
            }
        } else {
            Error::Remote {
                op,
                resource,
                id: id.to_string(),
                source,
            }
        }
    }
}

/// Validation errors for declared resource specs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Namespace is required")]
    NamespaceRequired,

    #[error("Keyname is required")]
    KeynameRequired,

    #[error("Secret is required")]
    SecretRequired,

    #[error("Interface identifier is required")]
    InterfaceRequired,

    #[error("Network identifier required")]
    NetworkIdRequired,

    #[error("Invalid key id {0:?}, expected \"namespace/keyname\"")]
    InvalidKeyId(String),

    #[error("Invalid netblock, expected an IPv4 CIDR: {0}")]
    InvalidNetblock(String),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("Invalid IPv4 address: {0}")]
    InvalidIpv4Address(String),

    #[error("At least 1 cpu is required")]
    CpusRequired,

    #[error("At least 1 MB of memory is required")]
    MemoryRequired,

    #[error("Disk size must be at least 1 GB")]
    DiskSizeRequired,

    #[error("At least one network is required")]
    NetworksRequired,

    #[error("{resource} field {field:?} cannot be changed in place, replacement required")]
    ImmutableChange {
        resource: &'static str,
        field: &'static str,
    },
}

/// Contract breaches reported by the control plane.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    /// A create call returned an empty identifier.
    #[error("control plane returned an empty {resource} identifier")]
    EmptyIdentifier { resource: &'static str },

    /// A floating address was attached but did not show up on read-back.
    #[error("interface {interface} has no floating address after attach")]
    MissingFloatingAddress { interface: String },
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
