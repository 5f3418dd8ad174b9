//! Input validation for declared resource specs.
//!
//! All checks run before any control plane call is issued, so a rejected
//! spec never leaves partial remote state behind.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::ValidationError;
use crate::resources::float::FloatSpec;
use crate::resources::instance::InstanceSpec;
use crate::resources::key::KeySpec;
use crate::resources::namespace::NamespaceSpec;
use crate::resources::network::NetworkSpec;

type Result<T> = std::result::Result<T, ValidationError>;

/// Validate a declared namespace spec.
pub fn validate_namespace(spec: &NamespaceSpec) -> Result<()> {
    if spec.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

/// Validate a declared access key spec.
pub fn validate_key(spec: &KeySpec) -> Result<()> {
    if spec.namespace.trim().is_empty() {
        return Err(ValidationError::NamespaceRequired);
    }
    if spec.keyname.trim().is_empty() {
        return Err(ValidationError::KeynameRequired);
    }
    if spec.secret.is_empty() {
        return Err(ValidationError::SecretRequired);
    }
    Ok(())
}

/// Validate a declared network spec, returning the parsed netblock.
pub fn validate_network(spec: &NetworkSpec) -> Result<Ipv4Net> {
    if spec.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    spec.netblock
        .parse()
        .map_err(|_| ValidationError::InvalidNetblock(spec.netblock.clone()))
}

/// Validate a declared instance spec.
pub fn validate_instance(spec: &InstanceSpec) -> Result<()> {
    if spec.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if spec.cpus == 0 {
        return Err(ValidationError::CpusRequired);
    }
    if spec.memory_mb == 0 {
        return Err(ValidationError::MemoryRequired);
    }
    for disk in &spec.disks {
        if disk.size_gb == 0 {
            return Err(ValidationError::DiskSizeRequired);
        }
    }
    if spec.networks.is_empty() {
        return Err(ValidationError::NetworksRequired);
    }
    for attachment in &spec.networks {
        if attachment.network_uuid.trim().is_empty() {
            return Err(ValidationError::NetworkIdRequired);
        }
        if let Some(address) = &attachment.address {
            parse_ipv4(address)?;
        }
        if let Some(mac) = &attachment.mac {
            parse_mac(mac)?;
        }
    }
    Ok(())
}

/// Validate a declared floating IP spec.
pub fn validate_float(spec: &FloatSpec) -> Result<()> {
    if spec.interface.trim().is_empty() {
        return Err(ValidationError::InterfaceRequired);
    }
    Ok(())
}

fn parse_ipv4(s: &str) -> Result<Ipv4Addr> {
    s.parse()
        .map_err(|_| ValidationError::InvalidIpv4Address(s.to_string()))
}

/// Parse a colon-separated MAC address.
pub fn parse_mac(s: &str) -> Result<[u8; 6]> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 6 {
        return Err(ValidationError::InvalidMacAddress(s.to_string()));
    }

    let mut mac = [0u8; 6];
    for (i, part) in parts.iter().enumerate() {
        mac[i] = u8::from_str_radix(part, 16)
            .map_err(|_| ValidationError::InvalidMacAddress(s.to_string()))?;
    }
    Ok(mac)
}
