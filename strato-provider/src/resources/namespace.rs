//! Namespace lifecycle handler.
//!
//! Namespaces are identified by name; the control plane assigns no separate
//! UUID. Existence is probed through the namespace listing because namespaces
//! carry no lifecycle state of their own.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strato_client::{ControlPlane, ResourceKind};
use tracing::info;

use super::Lifecycle;
use crate::error::{Error, Result, ValidationError};
use crate::metadata;
use crate::validate;

/// Declared state of a namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceSpec {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Control plane view of a namespace.
#[derive(Debug, Clone)]
pub struct ObservedNamespace {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub struct NamespaceHandler<C: ControlPlane> {
    cloud: Arc<C>,
}

impl<C: ControlPlane> NamespaceHandler<C> {
    pub fn new(cloud: Arc<C>) -> Self {
        Self { cloud }
    }
}

#[async_trait]
impl<C: ControlPlane> Lifecycle for NamespaceHandler<C> {
    type Spec = NamespaceSpec;
    type Observed = ObservedNamespace;

    async fn exists(&self, id: &str) -> Result<bool> {
        match self.cloud.list_namespaces().await {
            Ok(names) => Ok(names.iter().any(|n| n == id)),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(Error::remote("exists", "namespace", id, e)),
        }
    }

    async fn create(&self, spec: &Self::Spec) -> Result<String> {
        validate::validate_namespace(spec)?;
        info!("Creating namespace {}", spec.name);
        self.cloud
            .create_namespace(&spec.name)
            .await
            .map_err(|e| Error::remote("create", "namespace", &spec.name, e))?;
        metadata::apply(
            self.cloud.as_ref(),
            ResourceKind::Namespace,
            &spec.name,
            &spec.metadata,
        )
        .await?;
        Ok(spec.name.clone())
    }

    async fn read(&self, id: &str) -> Result<Self::Observed> {
        let metadata = self
            .cloud
            .get_metadata(ResourceKind::Namespace, id)
            .await
            .map_err(|e| Error::remote("read", "namespace", id, e))?;
        Ok(ObservedNamespace {
            name: id.to_string(),
            metadata,
        })
    }

    async fn update(&self, id: &str, previous: &Self::Spec, desired: &Self::Spec) -> Result<()> {
        if previous.name != desired.name {
            return Err(ValidationError::ImmutableChange {
                resource: "namespace",
                field: "name",
            }
            .into());
        }
        metadata::reconcile(
            self.cloud.as_ref(),
            ResourceKind::Namespace,
            id,
            &previous.metadata,
            &desired.metadata,
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        info!("Deleting namespace {}", id);
        match self.cloud.delete_namespace(id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::remote("delete", "namespace", id, e)),
        }
    }
}
