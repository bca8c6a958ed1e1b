//! Permission subsystem collaborator.
//!
//! Zones carry one managed permission each, named from a fixed template. The
//! engine only tracks the name; creation, storage, and enforcement belong to
//! the permission subsystem behind this trait.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{DnsError, Result};
use crate::store::Entry;

/// Name of the managed per-zone permission.
pub fn zone_permission_name(zone: &str) -> String {
    format!("Manage DNS zone {}", zone)
}

/// Grants and revokes named permissions.
pub trait PermissionBridge: Send + Sync {
    /// Create a permission; an existing name is a duplicate.
    fn grant(&self, permission: &str, spec: Entry) -> Result<()>;
    /// Delete a permission by name.
    fn revoke(&self, permission: &str) -> Result<()>;
    /// Fetch a permission's spec by name.
    fn show(&self, permission: &str) -> Result<Entry>;
}

/// In-memory permission subsystem, the reference bridge used in tests.
#[derive(Default)]
pub struct MemoryPermissions {
    permissions: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryPermissions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermissionBridge for MemoryPermissions {
    fn grant(&self, permission: &str, spec: Entry) -> Result<()> {
        let mut permissions = self.permissions.write();
        if permissions.contains_key(permission) {
            return Err(DnsError::duplicate(format!(
                "permission with name \"{}\" already exists",
                permission
            )));
        }
        debug!("granting permission {}", permission);
        permissions.insert(permission.to_string(), spec);
        Ok(())
    }

    fn revoke(&self, permission: &str) -> Result<()> {
        let mut permissions = self.permissions.write();
        permissions
            .remove(permission)
            .ok_or_else(|| DnsError::not_found(format!("{}: permission not found", permission)))?;
        debug!("revoked permission {}", permission);
        Ok(())
    }

    fn show(&self, permission: &str) -> Result<Entry> {
        self.permissions
            .read()
            .get(permission)
            .cloned()
            .ok_or_else(|| DnsError::not_found(format!("{}: permission not found", permission)))
    }
}
