//! Resource lifecycle handlers.
//!
//! Each handler compares a declared spec with the control plane's view and
//! issues the calls needed to converge, one resource type per module. The
//! orchestrator drives handlers through the [`Lifecycle`] trait and persists
//! the identifier returned by `create`.

pub mod float;
pub mod instance;
pub mod key;
pub mod namespace;
pub mod network;

use std::sync::Arc;

use async_trait::async_trait;
use strato_client::ControlPlane;

use crate::error::Result;

pub use float::{FloatHandler, FloatSpec, ObservedFloat};
pub use instance::{InstanceHandler, InstanceSpec, ObservedInstance};
pub use key::{KeyHandler, KeySpec, ObservedKey};
pub use namespace::{NamespaceHandler, NamespaceSpec, ObservedNamespace};
pub use network::{NetworkHandler, NetworkSpec, ObservedNetwork};

/// Trait for resource lifecycle handlers.
///
/// The state machine per resource is
/// `absent -> create -> present -> update* -> delete -> absent`; a record
/// tombstoned on the control plane counts as absent throughout.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// The declared (desired state) type.
    type Spec;
    /// The observed (control plane view) type.
    type Observed;

    /// Whether the resource currently exists. Remote not-found and tombstoned
    /// records both count as absent, not as errors.
    async fn exists(&self, id: &str) -> Result<bool>;

    /// Create the resource and return its identifier.
    async fn create(&self, spec: &Self::Spec) -> Result<String>;

    /// Fetch the authoritative view of the resource.
    async fn read(&self, id: &str) -> Result<Self::Observed>;

    /// Converge mutable fields from `previous` to `desired`. Changing a
    /// force-new field is a validation error; the orchestrator must plan a
    /// replacement instead.
    async fn update(&self, id: &str, previous: &Self::Spec, desired: &Self::Spec) -> Result<()>;

    /// Delete the resource. Deleting an already-absent resource succeeds.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Handler factory bound to one control plane client.
///
/// Handlers are cheap to construct (an `Arc` clone) and hold no state of
/// their own, so independent resources can be reconciled concurrently.
pub struct Provider<C: ControlPlane> {
    cloud: Arc<C>,
}

impl<C: ControlPlane> Provider<C> {
    /// Create a provider over a control plane client.
    pub fn new(cloud: Arc<C>) -> Self {
        Self { cloud }
    }

    pub fn namespaces(&self) -> NamespaceHandler<C> {
        NamespaceHandler::new(Arc::clone(&self.cloud))
    }

    pub fn keys(&self) -> KeyHandler<C> {
        KeyHandler::new(Arc::clone(&self.cloud))
    }

    pub fn networks(&self) -> NetworkHandler<C> {
        NetworkHandler::new(Arc::clone(&self.cloud))
    }

    pub fn instances(&self) -> InstanceHandler<C> {
        InstanceHandler::new(Arc::clone(&self.cloud))
    }

    pub fn floats(&self) -> FloatHandler<C> {
        FloatHandler::new(Arc::clone(&self.cloud))
    }
}
