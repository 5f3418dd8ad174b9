//! Access key lifecycle handler.
//!
//! Keys live inside a namespace, so the handler identifier is the composite
//! `"namespace/keyname"` and every operation is resolvable from the id alone.
//! The secret is write-only: the control plane never returns it, so reads can
//! only confirm the key is registered.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strato_client::ControlPlane;
use tracing::info;

use super::Lifecycle;
use crate::error::{Error, Result, ValidationError};
use crate::validate;

/// Declared state of an access key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeySpec {
    pub namespace: String,
    pub keyname: String,
    /// Secret value; write-only, never read back.
    pub secret: String,
}

/// Control plane view of an access key (the secret is not readable).
#[derive(Debug, Clone)]
pub struct ObservedKey {
    pub namespace: String,
    pub keyname: String,
}

/// Compose the handler identifier for a key.
pub fn key_id(namespace: &str, keyname: &str) -> String {
    format!("{}/{}", namespace, keyname)
}

fn split_key_id(id: &str) -> Result<(&str, &str)> {
    match id.split_once('/') {
        Some((namespace, keyname)) if !namespace.is_empty() && !keyname.is_empty() => {
            Ok((namespace, keyname))
        }
        _ => Err(ValidationError::InvalidKeyId(id.to_string()).into()),
    }
}

pub struct KeyHandler<C: ControlPlane> {
    cloud: Arc<C>,
}

impl<C: ControlPlane> KeyHandler<C> {
    pub fn new(cloud: Arc<C>) -> Self {
        Self { cloud }
    }
}

#[async_trait]
impl<C: ControlPlane> Lifecycle for KeyHandler<C> {
    type Spec = KeySpec;
    type Observed = ObservedKey;

    async fn exists(&self, id: &str) -> Result<bool> {
        let (namespace, keyname) = split_key_id(id)?;
        match self.cloud.list_keys(namespace).await {
            Ok(keys) => Ok(keys.iter().any(|k| k == keyname)),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(Error::remote("exists", "key", id, e)),
        }
    }

    async fn create(&self, spec: &Self::Spec) -> Result<String> {
        validate::validate_key(spec)?;
        info!("Creating key {} in namespace {}", spec.keyname, spec.namespace);
        self.cloud
            .create_key(&spec.namespace, &spec.keyname, &spec.secret)
            .await
            .map_err(|e| Error::remote("create", "key", &spec.keyname, e))?;
        Ok(key_id(&spec.namespace, &spec.keyname))
    }

    async fn read(&self, id: &str) -> Result<Self::Observed> {
        let (namespace, keyname) = split_key_id(id)?;
        let keys = self
            .cloud
            .list_keys(namespace)
            .await
            .map_err(|e| Error::remote("read", "key", id, e))?;
        if !keys.iter().any(|k| k == keyname) {
            return Err(Error::NotFound {
                op: "read",
                resource: "key",
                id: id.to_string(),
            });
        }
        Ok(ObservedKey {
            namespace: namespace.to_string(),
            keyname: keyname.to_string(),
        })
    }

    async fn update(&self, id: &str, previous: &Self::Spec, desired: &Self::Spec) -> Result<()> {
        if previous.namespace != desired.namespace {
            return Err(ValidationError::ImmutableChange {
                resource: "key",
                field: "namespace",
            }
            .into());
        }
        if previous.keyname != desired.keyname {
            return Err(ValidationError::ImmutableChange {
                resource: "key",
                field: "keyname",
            }
            .into());
        }
        if previous.secret == desired.secret {
            return Ok(());
        }
        validate::validate_key(desired)?;
        let (namespace, keyname) = split_key_id(id)?;
        info!("Rotating secret of key {}", id);
        self.cloud
            .update_key(namespace, keyname, &desired.secret)
            .await
            .map_err(|e| Error::remote("update", "key", id, e))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let (namespace, keyname) = split_key_id(id)?;
        info!("Deleting key {}", id);
        match self.cloud.delete_key(namespace, keyname).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::remote("delete", "key", id, e)),
        }
    }
}
