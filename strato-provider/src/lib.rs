//! Declarative resource lifecycle management for the Strato control plane.
//!
//! Each resource type (namespace, access key, network, instance, floating IP)
//! has a handler implementing the [`Lifecycle`] trait: existence probe,
//! create, read-back, in-place update, delete. Handlers converge control
//! plane state toward a declared spec and are driven by an external
//! orchestrator that owns dependency ordering and retries.
//!
//! ## Architecture
//!
//! - **Handlers** (`resources`): one per resource type, all generic over a
//!   [`strato_client::ControlPlane`] implementation
//! - **Metadata reconciler** (`metadata`): converges key/value metadata with
//!   a minimal set/delete diff instead of a full replace
//! - **Interface ordering** (`interfaces`): resolves the canonical attach
//!   order of an instance's interfaces for positional references

pub mod error;
pub mod interfaces;
pub mod metadata;
pub mod resources;
pub mod validate;

pub use error::{Error, InvariantViolation, Result, ValidationError};
pub use resources::{Lifecycle, Provider};
