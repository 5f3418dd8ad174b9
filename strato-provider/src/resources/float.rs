//! Floating IP lifecycle handler.
//!
//! A floating IP routes one externally reachable address to one instance
//! interface. The control plane picks the address from its floating pool;
//! the handler only attaches, verifies, and detaches. The handler identifier
//! is the interface UUID.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strato_client::ControlPlane;
use tracing::info;

use super::Lifecycle;
use crate::error::{Error, InvariantViolation, Result, ValidationError};
use crate::validate;

/// Declared state of a floating IP binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloatSpec {
    /// UUID of the interface to float.
    pub interface: String,
}

/// Control plane view of a floating IP binding.
#[derive(Debug, Clone)]
pub struct ObservedFloat {
    pub interface: String,
    /// The externally reachable address.
    pub ipv4: String,
}

pub struct FloatHandler<C: ControlPlane> {
    cloud: Arc<C>,
}

impl<C: ControlPlane> FloatHandler<C> {
    pub fn new(cloud: Arc<C>) -> Self {
        Self { cloud }
    }
}

#[async_trait]
impl<C: ControlPlane> Lifecycle for FloatHandler<C> {
    type Spec = FloatSpec;
    type Observed = ObservedFloat;

    async fn exists(&self, id: &str) -> Result<bool> {
        match self.cloud.get_interface(id).await {
            Ok(iface) => Ok(iface.floating_address().is_some()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(Error::remote("exists", "float", id, e)),
        }
    }

    async fn create(&self, spec: &Self::Spec) -> Result<String> {
        validate::validate_float(spec)?;
        info!("Attaching floating address to interface {}", spec.interface);
        self.cloud
            .attach_floating(&spec.interface)
            .await
            .map_err(|e| Error::remote("create", "float", &spec.interface, e))?;
        // Attach reports success before the address is recorded on the
        // interface, so read back and verify rather than trusting the ack.
        let iface = self
            .cloud
            .get_interface(&spec.interface)
            .await
            .map_err(|e| Error::remote("create", "float", &spec.interface, e))?;
        if iface.floating_address().is_none() {
            return Err(InvariantViolation::MissingFloatingAddress {
                interface: spec.interface.clone(),
            }
            .into());
        }
        Ok(spec.interface.clone())
    }

    async fn read(&self, id: &str) -> Result<Self::Observed> {
        let iface = self
            .cloud
            .get_interface(id)
            .await
            .map_err(|e| Error::remote("read", "float", id, e))?;
        match iface.floating_address() {
            Some(address) => Ok(ObservedFloat {
                interface: id.to_string(),
                ipv4: address.to_string(),
            }),
            None => Err(Error::NotFound {
                op: "read",
                resource: "float",
                id: id.to_string(),
            }),
        }
    }

    async fn update(&self, _id: &str, previous: &Self::Spec, desired: &Self::Spec) -> Result<()> {
        // No mutable fields; a different interface means a new binding.
        if previous.interface != desired.interface {
            return Err(ValidationError::ImmutableChange {
                resource: "float",
                field: "interface",
            }
            .into());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        info!("Detaching floating address from interface {}", id);
        match self.cloud.detach_floating(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::remote("delete", "float", id, e)),
        }
    }
}
