//! Name resolution collaborator.
//!
//! Nameserver targets must be backed by an address record somewhere the
//! engine can see. The store-backed resolver answers from zone data; the
//! fixed resolver is for wiring up tests and externally known hosts.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::name;
use crate::records::types::RecordType;
use crate::store::DirectoryStore;

/// Answers whether an FQDN has an A or AAAA record.
pub trait NameResolver: Send + Sync {
    fn has_address_record(&self, fqdn: &str) -> bool;
}

/// Resolver backed by the directory store's own zone data.
pub struct StoreResolver {
    store: Arc<dyn DirectoryStore>,
}

impl StoreResolver {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }
}

impl NameResolver for StoreResolver {
    fn has_address_record(&self, fqdn: &str) -> bool {
        // Longest-suffix zone match, then look the relative name up in it
        let mut best: Option<(String, String)> = None;
        for (zone_key, _) in self.store.list_zones() {
            if !name::in_zone(fqdn, &zone_key) {
                continue;
            }
            let better = best
                .as_ref()
                .is_none_or(|(current, _)| zone_key.len() > current.len());
            if better {
                if let Some(relative) = name::relative_name(fqdn, &zone_key) {
                    best = Some((zone_key, relative));
                }
            }
        }

        let Some((zone_key, relative)) = best else {
            return false;
        };
        let entry = if relative == name::ROOT_NAME {
            self.store.get_zone(&zone_key)
        } else {
            self.store.get_record(&zone_key, &relative)
        };
        let Some(entry) = entry else {
            return false;
        };
        [RecordType::A, RecordType::AAAA]
            .iter()
            .any(|t| entry.get(t.attr()).is_some_and(|values| !values.is_empty()))
    }
}

/// Resolver over a fixed, mutable name set.
#[derive(Default)]
pub struct FixedResolver {
    names: RwLock<HashSet<String>>,
}

impl FixedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an FQDN as having an address record.
    pub fn insert(&self, fqdn: &str) {
        self.names.write().insert(name::zone_key(fqdn));
    }
}

impl NameResolver for FixedResolver {
    fn has_address_record(&self, fqdn: &str) -> bool {
        self.names.read().contains(&name::zone_key(fqdn))
    }
}
