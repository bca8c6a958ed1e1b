//! Directory store collaborator.
//!
//! The engine never owns persistent state; it issues whole-entry reads and
//! writes against this trait. Entries are ordered attribute-to-values maps,
//! keyed by zone name plus record name. The zone entry doubles as the root
//! (`@`) record holder. Concurrent writers are serialized by the store.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{DnsError, Result};
use crate::name;

/// A directory entry: attribute name to ordered string values.
pub type Entry = BTreeMap<String, Vec<String>>;

/// Zone/record entry CRUD plus the global config singleton.
pub trait DirectoryStore: Send + Sync {
    fn zone_exists(&self, zone: &str) -> bool;
    fn create_zone(&self, zone: &str, entry: Entry) -> Result<()>;
    fn get_zone(&self, zone: &str) -> Option<Entry>;
    fn put_zone(&self, zone: &str, entry: Entry) -> Result<()>;
    fn delete_zone(&self, zone: &str) -> Result<()>;
    /// All zones with their entries, ordered by zone key.
    fn list_zones(&self) -> Vec<(String, Entry)>;

    fn get_record(&self, zone: &str, record: &str) -> Option<Entry>;
    /// Create or replace a record entry.
    fn put_record(&self, zone: &str, record: &str, entry: Entry) -> Result<()>;
    fn delete_record(&self, zone: &str, record: &str) -> Result<()>;
    /// All non-root records of a zone, ordered by name.
    fn list_records(&self, zone: &str) -> Vec<(String, Entry)>;

    fn get_config(&self) -> Entry;
    fn put_config(&self, entry: Entry);
}

#[derive(Debug, Default, Clone)]
struct ZoneData {
    attrs: Entry,
    records: BTreeMap<String, Entry>,
}

/// In-memory directory, the reference store used in tests.
#[derive(Default)]
pub struct MemoryDirectory {
    zones: RwLock<BTreeMap<String, ZoneData>>,
    config: RwLock<Entry>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirectoryStore for MemoryDirectory {
    fn zone_exists(&self, zone: &str) -> bool {
        self.zones.read().contains_key(&name::zone_key(zone))
    }

    fn create_zone(&self, zone: &str, entry: Entry) -> Result<()> {
        let key = name::zone_key(zone);
        let mut zones = self.zones.write();
        if zones.contains_key(&key) {
            return Err(DnsError::duplicate("This entry already exists"));
        }
        debug!("creating zone entry {}", key);
        zones.insert(
            key,
            ZoneData {
                attrs: entry,
                records: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn get_zone(&self, zone: &str) -> Option<Entry> {
        self.zones
            .read()
            .get(&name::zone_key(zone))
            .map(|data| data.attrs.clone())
    }

    fn put_zone(&self, zone: &str, entry: Entry) -> Result<()> {
        let key = name::zone_key(zone);
        let mut zones = self.zones.write();
        let data = zones
            .get_mut(&key)
            .ok_or_else(|| DnsError::not_found(format!("{}: DNS zone not found", zone)))?;
        data.attrs = entry;
        Ok(())
    }

    fn delete_zone(&self, zone: &str) -> Result<()> {
        let key = name::zone_key(zone);
        let mut zones = self.zones.write();
        zones
            .remove(&key)
            .ok_or_else(|| DnsError::not_found(format!("{}: DNS zone not found", zone)))?;
        debug!("deleted zone entry {}", key);
        Ok(())
    }

    fn list_zones(&self) -> Vec<(String, Entry)> {
        self.zones
            .read()
            .iter()
            .map(|(key, data)| (key.clone(), data.attrs.clone()))
            .collect()
    }

    fn get_record(&self, zone: &str, record: &str) -> Option<Entry> {
        self.zones
            .read()
            .get(&name::zone_key(zone))
            .and_then(|data| data.records.get(record).cloned())
    }

    fn put_record(&self, zone: &str, record: &str, entry: Entry) -> Result<()> {
        let key = name::zone_key(zone);
        let mut zones = self.zones.write();
        let data = zones
            .get_mut(&key)
            .ok_or_else(|| DnsError::not_found(format!("{}: DNS zone not found", zone)))?;
        data.records.insert(record.to_string(), entry);
        Ok(())
    }

    fn delete_record(&self, zone: &str, record: &str) -> Result<()> {
        let key = name::zone_key(zone);
        let mut zones = self.zones.write();
        let data = zones
            .get_mut(&key)
            .ok_or_else(|| DnsError::not_found(format!("{}: DNS zone not found", zone)))?;
        data.records.remove(record).ok_or_else(|| {
            DnsError::not_found(format!("{}: DNS resource record not found", record))
        })?;
        Ok(())
    }

    fn list_records(&self, zone: &str) -> Vec<(String, Entry)> {
        self.zones
            .read()
            .get(&name::zone_key(zone))
            .map(|data| {
                data.records
                    .iter()
                    .map(|(record, entry)| (record.clone(), entry.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_config(&self) -> Entry {
        self.config.read().clone()
    }

    fn put_config(&self, entry: Entry) {
        *self.config.write() = entry;
    }
}

/// Build an entry from attribute/value slices, a test and setup helper.
pub fn entry_from(attrs: &[(&str, &[&str])]) -> Entry {
    attrs
        .iter()
        .map(|(attr, values)| {
            (
                attr.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}
