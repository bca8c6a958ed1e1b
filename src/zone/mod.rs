pub mod acl;
pub mod lifecycle;
pub mod reverse;

pub use lifecycle::{ZoneAdd, ZoneDelta, ZoneLifecycle};

use crate::error::DnsError;

/// The not-found error for a missing zone.
pub fn zone_not_found(zone: &str) -> DnsError {
    DnsError::not_found(format!("{}: DNS zone not found", zone))
}

/// Zone entry attribute names.
pub mod attrs {
    pub const IDNS_NAME: &str = "idnsname";
    pub const ZONE_ACTIVE: &str = "idnszoneactive";
    pub const SOA_MNAME: &str = "idnssoamname";
    pub const SOA_RNAME: &str = "idnssoarname";
    pub const SOA_SERIAL: &str = "idnssoaserial";
    pub const SOA_REFRESH: &str = "idnssoarefresh";
    pub const SOA_RETRY: &str = "idnssoaretry";
    pub const SOA_EXPIRE: &str = "idnssoaexpire";
    pub const SOA_MINIMUM: &str = "idnssoaminimum";
    pub const ALLOW_DYNUPDATE: &str = "idnsallowdynupdate";
    pub const UPDATE_POLICY: &str = "idnsupdatepolicy";
    pub const ALLOW_TRANSFER: &str = "idnsallowtransfer";
    pub const ALLOW_QUERY: &str = "idnsallowquery";
    pub const FORWARDERS: &str = "idnsforwarders";
    pub const FORWARD_POLICY: &str = "idnsforwardpolicy";
    pub const ALLOW_SYNC_PTR: &str = "idnsallowsyncptr";
}

/// Zone defaults
pub mod constants {
    /// Default SOA refresh interval (1 hour)
    pub const DEFAULT_SOA_REFRESH: u32 = 3600;

    /// Default SOA retry interval (15 minutes)
    pub const DEFAULT_SOA_RETRY: u32 = 900;

    /// Default SOA expire interval (14 days)
    pub const DEFAULT_SOA_EXPIRE: u32 = 1209600;

    /// Default SOA minimum/negative TTL (1 hour)
    pub const DEFAULT_SOA_MINIMUM: u32 = 3600;

    pub const DEFAULT_ALLOW_TRANSFER: &str = "none;";
    pub const DEFAULT_ALLOW_QUERY: &str = "any;";

    /// Directory boolean literals
    pub const TRUE: &str = "TRUE";
    pub const FALSE: &str = "FALSE";
}
