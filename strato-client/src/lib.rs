//! Client contract for the Strato control plane.
//!
//! This crate defines the wire types, connection configuration, and the
//! [`ControlPlane`] trait family that the resource handlers in
//! `strato-provider` are written against. Transport implementations (HTTP,
//! test fakes) live elsewhere; everything here is transport-neutral.

pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use api::{
    ControlPlane, CreateNetworkRequest, FloatingApi, InstanceApi, InstanceCreateRequest,
    MetadataApi, NamespaceApi, NetworkApi,
};
pub use config::{Config, ConfigError};
pub use error::{ClientError, Result};
pub use types::{
    DiskSpec, Instance, Interface, Network, NetworkAttachment, ResourceKind, STATE_DELETED,
    VideoSpec,
};
