//! Network lifecycle handler.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strato_client::{ControlPlane, CreateNetworkRequest, ResourceKind};
use tracing::info;

use super::Lifecycle;
use crate::error::{Error, InvariantViolation, Result, ValidationError};
use crate::metadata;
use crate::validate;

/// Declared state of a virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    /// IPv4 CIDR the network hands addresses out of.
    pub netblock: String,
    pub provide_dhcp: bool,
    pub provide_nat: bool,
    pub metadata: HashMap<String, String>,
}

/// Control plane view of a network.
#[derive(Debug, Clone)]
pub struct ObservedNetwork {
    pub uuid: String,
    pub name: String,
    pub netblock: String,
    pub provide_dhcp: bool,
    pub provide_nat: bool,
    pub state: String,
    pub metadata: HashMap<String, String>,
}

pub struct NetworkHandler<C: ControlPlane> {
    cloud: Arc<C>,
}

impl<C: ControlPlane> NetworkHandler<C> {
    pub fn new(cloud: Arc<C>) -> Self {
        Self { cloud }
    }
}

#[async_trait]
impl<C: ControlPlane> Lifecycle for NetworkHandler<C> {
    type Spec = NetworkSpec;
    type Observed = ObservedNetwork;

    async fn exists(&self, id: &str) -> Result<bool> {
        match self.cloud.get_network(id).await {
            Ok(network) => Ok(!network.is_deleted()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(Error::remote("exists", "network", id, e)),
        }
    }

    async fn create(&self, spec: &Self::Spec) -> Result<String> {
        validate::validate_network(spec)?;
        info!("Creating network {} ({})", spec.name, spec.netblock);
        let req = CreateNetworkRequest {
            name: spec.name.clone(),
            netblock: spec.netblock.clone(),
            provide_dhcp: spec.provide_dhcp,
            provide_nat: spec.provide_nat,
        };
        let network = self
            .cloud
            .create_network(req)
            .await
            .map_err(|e| Error::remote("create", "network", &spec.name, e))?;
        // A server-side fault can produce a record with a blank UUID; binding
        // it would orphan the resource.
        if network.uuid.is_empty() {
            return Err(InvariantViolation::EmptyIdentifier {
                resource: "network",
            }
            .into());
        }
        metadata::apply(
            self.cloud.as_ref(),
            ResourceKind::Network,
            &network.uuid,
            &spec.metadata,
        )
        .await?;
        Ok(network.uuid)
    }

    async fn read(&self, id: &str) -> Result<Self::Observed> {
        let network = self
            .cloud
            .get_network(id)
            .await
            .map_err(|e| Error::remote("read", "network", id, e))?;
        if network.is_deleted() {
            return Err(Error::NotFound {
                op: "read",
                resource: "network",
                id: id.to_string(),
            });
        }
        let metadata = self
            .cloud
            .get_metadata(ResourceKind::Network, id)
            .await
            .map_err(|e| Error::remote("read", "network", id, e))?;
        Ok(ObservedNetwork {
            uuid: network.uuid,
            name: network.name,
            netblock: network.netblock,
            provide_dhcp: network.provide_dhcp,
            provide_nat: network.provide_nat,
            state: network.state,
            metadata,
        })
    }

    async fn update(&self, id: &str, previous: &Self::Spec, desired: &Self::Spec) -> Result<()> {
        // Only metadata is mutable; the address plan is fixed at creation.
        if previous.name != desired.name {
            return Err(immutable("name"));
        }
        if previous.netblock != desired.netblock {
            return Err(immutable("netblock"));
        }
        if previous.provide_dhcp != desired.provide_dhcp {
            return Err(immutable("provide_dhcp"));
        }
        if previous.provide_nat != desired.provide_nat {
            return Err(immutable("provide_nat"));
        }
        metadata::reconcile(
            self.cloud.as_ref(),
            ResourceKind::Network,
            id,
            &previous.metadata,
            &desired.metadata,
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        info!("Deleting network {}", id);
        match self.cloud.delete_network(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::remote("delete", "network", id, e)),
        }
    }
}

fn immutable(field: &'static str) -> Error {
    ValidationError::ImmutableChange {
        resource: "network",
        field,
    }
    .into()
}
