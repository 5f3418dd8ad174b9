//! Shared in-memory control plane fake for integration tests.
//!
//! `FakeCloud` implements the full `ControlPlane` trait family over mutexed
//! maps, records every call it receives, and supports scripted failures so
//! tests can drive the handlers without a real control plane.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use strato_client::{
    ClientError, CreateNetworkRequest, FloatingApi, Instance, InstanceApi, InstanceCreateRequest,
    Interface, MetadataApi, NamespaceApi, Network, NetworkApi, ResourceKind, Result,
};

/// In-memory control plane with call recording and scripted failures.
#[derive(Default)]
pub struct FakeCloud {
    state: Mutex<State>,
    calls: Mutex<Vec<String>>,
    /// Substrings of call log lines that fail with a remote error.
    fail_needles: Mutex<Vec<String>>,
    /// When set, attach_floating acks without recording an address.
    pub drop_float_address: AtomicBool,
    /// When set, create calls return records with an empty UUID.
    pub mint_empty_uuid: AtomicBool,
    float_counter: AtomicU32,
}

#[derive(Default)]
struct State {
    namespaces: BTreeSet<String>,
    /// namespace -> keyname -> secret
    keys: BTreeMap<String, BTreeMap<String, String>>,
    networks: BTreeMap<String, Network>,
    instances: BTreeMap<String, Instance>,
    interfaces: BTreeMap<String, Interface>,
    metadata: HashMap<(ResourceKind, String), HashMap<String, String>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Make any call whose log line contains `needle` fail with a remote
    /// error. The attempt is still recorded but takes no effect.
    pub fn fail_on(&self, needle: &str) {
        self.fail_needles.lock().unwrap().push(needle.to_string());
    }

    /// The remote metadata map of a resource, for assertions.
    pub fn metadata_of(&self, kind: ResourceKind, id: &str) -> HashMap<String, String> {
        self.state
            .lock()
            .unwrap()
            .metadata
            .get(&(kind, id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Interface UUIDs minted for an instance, in attach order.
    pub fn interfaces_of(&self, instance_uuid: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut interfaces: Vec<&Interface> = state
            .interfaces
            .values()
            .filter(|i| i.instance_uuid == instance_uuid)
            .collect();
        interfaces.sort_by_key(|i| i.order);
        interfaces.iter().map(|i| i.uuid.clone()).collect()
    }

    /// The stored secret of a key, for rotation assertions.
    pub fn secret_of(&self, namespace: &str, keyname: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .keys
            .get(namespace)
            .and_then(|keys| keys.get(keyname))
            .cloned()
    }

    /// Force a network's lifecycle state (tombstone tests).
    pub fn set_network_state(&self, uuid: &str, state: &str) {
        if let Some(network) = self.state.lock().unwrap().networks.get_mut(uuid) {
            network.state = state.to_string();
        }
    }

    /// Force an instance's lifecycle state (tombstone tests).
    pub fn set_instance_state(&self, uuid: &str, state: &str) {
        if let Some(instance) = self.state.lock().unwrap().instances.get_mut(uuid) {
            instance.state = state.to_string();
        }
    }

    /// Record a call and fail it if a registered needle matches.
    fn begin(&self, line: String) -> Result<()> {
        self.calls.lock().unwrap().push(line.clone());
        let needles = self.fail_needles.lock().unwrap();
        if needles.iter().any(|n| line.contains(n.as_str())) {
            return Err(ClientError::Remote(format!("injected failure on {}", line)));
        }
        Ok(())
    }

    fn mint_uuid(&self) -> String {
        if self.mint_empty_uuid.load(Ordering::Relaxed) {
            String::new()
        } else {
            uuid::Uuid::new_v4().to_string()
        }
    }
}

fn resource_exists(state: &State, kind: ResourceKind, id: &str) -> bool {
    match kind {
        ResourceKind::Namespace => state.namespaces.contains(id),
        ResourceKind::Network => state.networks.contains_key(id),
        ResourceKind::Instance => state.instances.contains_key(id),
    }
}

fn not_found(what: &str, id: &str) -> ClientError {
    ClientError::NotFound(format!("{} {}", what, id))
}

#[async_trait]
impl NamespaceApi for FakeCloud {
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        self.begin("list_namespaces".to_string())?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .namespaces
            .iter()
            .cloned()
            .collect())
    }

    async fn create_namespace(&self, name: &str) -> Result<()> {
        self.begin(format!("create_namespace {}", name))?;
        self.state.lock().unwrap().namespaces.insert(name.to_string());
        Ok(())
    }

    async fn delete_namespace(&self, name: &str) -> Result<()> {
        self.begin(format!("delete_namespace {}", name))?;
        let mut state = self.state.lock().unwrap();
        if !state.namespaces.remove(name) {
            return Err(not_found("namespace", name));
        }
        state.keys.remove(name);
        state
            .metadata
            .remove(&(ResourceKind::Namespace, name.to_string()));
        Ok(())
    }

    async fn list_keys(&self, namespace: &str) -> Result<Vec<String>> {
        self.begin(format!("list_keys {}", namespace))?;
        let state = self.state.lock().unwrap();
        if !state.namespaces.contains(namespace) {
            return Err(not_found("namespace", namespace));
        }
        Ok(state
            .keys
            .get(namespace)
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_key(&self, namespace: &str, keyname: &str, secret: &str) -> Result<()> {
        self.begin(format!("create_key {} {}", namespace, keyname))?;
        let mut state = self.state.lock().unwrap();
        if !state.namespaces.contains(namespace) {
            return Err(not_found("namespace", namespace));
        }
        state
            .keys
            .entry(namespace.to_string())
            .or_default()
            .insert(keyname.to_string(), secret.to_string());
        Ok(())
    }

    async fn update_key(&self, namespace: &str, keyname: &str, secret: &str) -> Result<()> {
        self.begin(format!("update_key {} {}", namespace, keyname))?;
        let mut state = self.state.lock().unwrap();
        match state
            .keys
            .get_mut(namespace)
            .and_then(|keys| keys.get_mut(keyname))
        {
            Some(stored) => {
                *stored = secret.to_string();
                Ok(())
            }
            None => Err(not_found("key", keyname)),
        }
    }

    async fn delete_key(&self, namespace: &str, keyname: &str) -> Result<()> {
        self.begin(format!("delete_key {} {}", namespace, keyname))?;
        let mut state = self.state.lock().unwrap();
        let removed = state
            .keys
            .get_mut(namespace)
            .and_then(|keys| keys.remove(keyname));
        match removed {
            Some(_) => Ok(()),
            None => Err(not_found("key", keyname)),
        }
    }
}

#[async_trait]
impl NetworkApi for FakeCloud {
    async fn create_network(&self, req: CreateNetworkRequest) -> Result<Network> {
        self.begin(format!("create_network {}", req.name))?;
        let network = Network {
            uuid: self.mint_uuid(),
            name: req.name,
            namespace: "system".to_string(),
            netblock: req.netblock,
            provide_dhcp: req.provide_dhcp,
            provide_nat: req.provide_nat,
            state: "created".to_string(),
        };
        if !network.uuid.is_empty() {
            self.state
                .lock()
                .unwrap()
                .networks
                .insert(network.uuid.clone(), network.clone());
        }
        Ok(network)
    }

    async fn get_network(&self, uuid: &str) -> Result<Network> {
        self.begin(format!("get_network {}", uuid))?;
        self.state
            .lock()
            .unwrap()
            .networks
            .get(uuid)
            .cloned()
            .ok_or_else(|| not_found("network", uuid))
    }

    async fn delete_network(&self, uuid: &str) -> Result<()> {
        self.begin(format!("delete_network {}", uuid))?;
        let mut state = self.state.lock().unwrap();
        match state.networks.get_mut(uuid) {
            Some(network) if !network.is_deleted() => {
                network.state = "deleted".to_string();
                Ok(())
            }
            _ => Err(not_found("network", uuid)),
        }
    }
}

#[async_trait]
impl InstanceApi for FakeCloud {
    async fn create_instance(&self, req: InstanceCreateRequest) -> Result<Instance> {
        self.begin(format!("create_instance {}", req.name))?;
        let uuid = self.mint_uuid();
        let instance = Instance {
            uuid: uuid.clone(),
            name: req.name,
            namespace: "system".to_string(),
            cpus: req.cpus,
            memory_mb: req.memory_mb,
            disks: req.disks,
            video: req.video,
            ssh_key: req.ssh_key,
            user_data: req.user_data,
            node: "node-1".to_string(),
            console_port: 5900,
            vdi_port: 5901,
            state: "created".to_string(),
        };
        if uuid.is_empty() {
            return Ok(instance);
        }
        let mut state = self.state.lock().unwrap();
        for (i, attachment) in req.networks.iter().enumerate() {
            let iface = Interface {
                uuid: uuid::Uuid::new_v4().to_string(),
                instance_uuid: uuid.clone(),
                network_uuid: attachment.network_uuid.clone(),
                order: i as u32,
                mac: attachment
                    .mac
                    .clone()
                    .unwrap_or_else(|| format!("02:00:00:00:00:{:02x}", i + 1)),
                ipv4: attachment.address.clone(),
                model: attachment
                    .model
                    .clone()
                    .unwrap_or_else(|| "virtio".to_string()),
                floating: None,
            };
            state.interfaces.insert(iface.uuid.clone(), iface);
        }
        state.instances.insert(uuid, instance.clone());
        Ok(instance)
    }

    async fn get_instance(&self, uuid: &str) -> Result<Instance> {
        self.begin(format!("get_instance {}", uuid))?;
        self.state
            .lock()
            .unwrap()
            .instances
            .get(uuid)
            .cloned()
            .ok_or_else(|| not_found("instance", uuid))
    }

    async fn delete_instance(&self, uuid: &str) -> Result<()> {
        self.begin(format!("delete_instance {}", uuid))?;
        let mut state = self.state.lock().unwrap();
        match state.instances.get_mut(uuid) {
            Some(instance) if !instance.is_deleted() => {
                instance.state = "deleted".to_string();
                Ok(())
            }
            _ => Err(not_found("instance", uuid)),
        }
    }

    async fn get_interfaces(&self, instance_uuid: &str) -> Result<Vec<Interface>> {
        self.begin(format!("get_interfaces {}", instance_uuid))?;
        let state = self.state.lock().unwrap();
        if !state.instances.contains_key(instance_uuid) {
            return Err(not_found("instance", instance_uuid));
        }
        let mut interfaces: Vec<Interface> = state
            .interfaces
            .values()
            .filter(|i| i.instance_uuid == instance_uuid)
            .cloned()
            .collect();
        // Deliberately worst-case response ordering; callers must sort.
        interfaces.sort_by(|a, b| b.order.cmp(&a.order));
        Ok(interfaces)
    }
}

#[async_trait]
impl MetadataApi for FakeCloud {
    async fn get_metadata(&self, kind: ResourceKind, id: &str) -> Result<HashMap<String, String>> {
        self.begin(format!("get_metadata {} {}", kind, id))?;
        let state = self.state.lock().unwrap();
        if !resource_exists(&state, kind, id) {
            return Err(not_found(kind.as_str(), id));
        }
        Ok(state
            .metadata
            .get(&(kind, id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn set_metadata(
        &self,
        kind: ResourceKind,
        id: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        self.begin(format!("set_metadata {} {} {}={}", kind, id, key, value))?;
        let mut state = self.state.lock().unwrap();
        if !resource_exists(&state, kind, id) {
            return Err(not_found(kind.as_str(), id));
        }
        state
            .metadata
            .entry((kind, id.to_string()))
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_metadata(&self, kind: ResourceKind, id: &str, key: &str) -> Result<()> {
        self.begin(format!("delete_metadata {} {} {}", kind, id, key))?;
        let mut state = self.state.lock().unwrap();
        if !resource_exists(&state, kind, id) {
            return Err(not_found(kind.as_str(), id));
        }
        let removed = state
            .metadata
            .get_mut(&(kind, id.to_string()))
            .and_then(|map| map.remove(key));
        match removed {
            Some(_) => Ok(()),
            None => Err(not_found("metadata key", key)),
        }
    }
}

#[async_trait]
impl FloatingApi for FakeCloud {
    async fn get_interface(&self, uuid: &str) -> Result<Interface> {
        self.begin(format!("get_interface {}", uuid))?;
        self.state
            .lock()
            .unwrap()
            .interfaces
            .get(uuid)
            .cloned()
            .ok_or_else(|| not_found("interface", uuid))
    }

    async fn attach_floating(&self, interface_uuid: &str) -> Result<()> {
        self.begin(format!("attach_floating {}", interface_uuid))?;
        if self.drop_float_address.load(Ordering::Relaxed) {
            return Ok(());
        }
        let address = format!(
            "192.0.2.{}",
            self.float_counter.fetch_add(1, Ordering::Relaxed) + 1
        );
        let mut state = self.state.lock().unwrap();
        match state.interfaces.get_mut(interface_uuid) {
            Some(iface) => {
                iface.floating = Some(address);
                Ok(())
            }
            None => Err(not_found("interface", interface_uuid)),
        }
    }

    async fn detach_floating(&self, interface_uuid: &str) -> Result<()> {
        self.begin(format!("detach_floating {}", interface_uuid))?;
        let mut state = self.state.lock().unwrap();
        match state.interfaces.get_mut(interface_uuid) {
            Some(iface) => {
                iface.floating = None;
                Ok(())
            }
            None => Err(not_found("interface", interface_uuid)),
        }
    }
}

/// Build a metadata map from string pairs.
pub fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
