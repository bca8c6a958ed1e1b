//! Common fixtures shared by the zone and record operation tests.

#![allow(dead_code)] // Not every helper is used by every test file

use std::sync::Arc;

use zonewarden::permission::MemoryPermissions;
use zonewarden::resolver::StoreResolver;
use zonewarden::{EngineConfig, MemoryDirectory, RecordSetController, ZoneAdd, ZoneLifecycle};

pub const REALM: &str = "EXAMPLE.COM";
pub const ZONE1: &str = "dnszone.test";
pub const ZONE1_NS: &str = "ns1.dnszone.test.";
pub const ZONE1_RNAME: &str = "root.dnszone.test.";
pub const ZONE1_IP: &str = "172.16.29.111";
pub const REVZONE1: &str = "31.16.172.in-addr.arpa.";

pub struct Fixture {
    pub store: Arc<MemoryDirectory>,
    pub permissions: Arc<MemoryPermissions>,
    pub zones: ZoneLifecycle,
    pub records: RecordSetController,
}

pub fn fixture() -> Fixture {
    let store = Arc::new(MemoryDirectory::new());
    let resolver = Arc::new(StoreResolver::new(store.clone()));
    let permissions = Arc::new(MemoryPermissions::new());
    let zones = ZoneLifecycle::new(
        store.clone(),
        resolver.clone(),
        permissions.clone(),
        EngineConfig::new(REALM),
    );
    let records = RecordSetController::new(store.clone(), resolver);
    Fixture {
        store,
        permissions,
        zones,
        records,
    }
}

/// Create the primary test zone with its nameserver glue record, the way a
/// deployment bootstraps its first forward zone.
pub fn add_zone1(fixture: &Fixture) {
    fixture
        .zones
        .add(ZoneAdd {
            name: Some(ZONE1.to_string()),
            nameserver: ZONE1_NS.to_string(),
            admin_email: ZONE1_RNAME.to_string(),
            ip_address: Some(ZONE1_IP.to_string()),
            ..Default::default()
        })
        .unwrap();
}

/// Create the reverse zone for 172.16.31.0/24; requires `add_zone1` so the
/// nameserver resolves.
pub fn add_revzone1(fixture: &Fixture) {
    fixture
        .zones
        .add(ZoneAdd {
            name: Some(REVZONE1.to_string()),
            nameserver: ZONE1_NS.to_string(),
            admin_email: ZONE1_RNAME.to_string(),
            ..Default::default()
        })
        .unwrap();
}
