//! Zone lifecycle: create, modify, enable/disable, delete, and the managed
//! per-zone permission.
//!
//! A zone moves between {absent, active, disabled}. Creation synthesizes the
//! SOA defaults, the dynamic-update policy text, and the realm TXT record;
//! deletion is two-phase (records first, then the zone entry) and also
//! retires the managed permission.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::{Datelike, Local};
use tracing::{debug, info};

use super::{acl, attrs, constants, reverse, zone_not_found};
use crate::api::{DeleteStatus, FindResult, OpResult};
use crate::config::EngineConfig;
use crate::error::{DnsError, Result};
use crate::name;
use crate::permission::{PermissionBridge, zone_permission_name};
use crate::records::types::RecordType;
use crate::records::validator;
use crate::resolver::NameResolver;
use crate::store::{DirectoryStore, Entry};

/// Inputs to zone creation.
#[derive(Debug, Clone, Default)]
pub struct ZoneAdd {
    /// Zone name; exactly one of this and `name_from_ip` must be set.
    pub name: Option<String>,
    /// IP address or CIDR network to derive a reverse zone name from.
    pub name_from_ip: Option<String>,
    /// Authoritative nameserver (SOA mname).
    pub nameserver: String,
    /// Responsible party (SOA rname).
    pub admin_email: String,
    /// Address for the nameserver's glue record; the nameserver must then
    /// live inside the new zone.
    pub ip_address: Option<String>,
    /// Skip the nameserver resolvability check.
    pub force: bool,
}

/// Attribute deltas for zone modification; `None` clears an attribute.
pub type ZoneDelta = BTreeMap<String, Option<Vec<String>>>;

/// Orchestrates zone state transitions against the collaborators.
pub struct ZoneLifecycle {
    store: Arc<dyn DirectoryStore>,
    resolver: Arc<dyn NameResolver>,
    permissions: Arc<dyn PermissionBridge>,
    config: EngineConfig,
}

impl ZoneLifecycle {
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        resolver: Arc<dyn NameResolver>,
        permissions: Arc<dyn PermissionBridge>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            permissions,
            config,
        }
    }

    /// Create a zone; the new zone starts active.
    pub fn add(&self, options: ZoneAdd) -> Result<OpResult<Entry>> {
        let zone = match (&options.name, &options.name_from_ip) {
            (Some(_), Some(_)) => {
                return Err(DnsError::validation(
                    "name_from_ip",
                    "cannot be used together with a zone name",
                ));
            }
            (None, None) => return Err(DnsError::requirement("name")),
            (Some(name), None) => {
                validator::validate_zone_name(name)?;
                name.clone()
            }
            (None, Some(input)) => reverse::zone_name_from_ip(input)?,
        };
        let reverse_zone = name::is_reverse_zone(&zone);

        let nameserver = options.nameserver.trim().to_string();
        if reverse_zone && !name::is_fqdn(&nameserver) {
            return Err(DnsError::validation(
                "name-server",
                "Nameserver for reverse zone cannot be a relative DNS name",
            ));
        }
        name::validate_name(&nameserver, false).map_err(|_| {
            DnsError::validation("name-server", name::domain_name_message(false))
        })?;

        if self.store.zone_exists(&zone) {
            return Err(DnsError::duplicate(format!(
                "DNS zone with name \"{}\" already exists",
                zone
            )));
        }

        let qualified_ns = name::qualify(&nameserver, &zone);
        let glue = match &options.ip_address {
            Some(ip) => {
                let address: IpAddr = ip.parse().map_err(|_| {
                    DnsError::validation("ip_address", "invalid IP address format")
                })?;
                if !name::in_zone(&qualified_ns, &zone) {
                    return Err(DnsError::validation(
                        "ip_address",
                        "Nameserver DNS record is created only for nameservers in current zone",
                    ));
                }
                Some(address)
            }
            None => {
                // Glue absent, so the nameserver has to exist somewhere
                validator::check_nameservers(
                    self.resolver.as_ref(),
                    &zone,
                    std::slice::from_ref(&nameserver),
                    options.force,
                )?;
                None
            }
        };

        let entry = self.initial_zone_entry(&zone, &nameserver, &options.admin_email, reverse_zone);
        self.store.create_zone(&zone, entry)?;

        if !reverse_zone {
            let kerberos = crate::store::entry_from(&[
                (attrs::IDNS_NAME, &["_kerberos"]),
                (RecordType::TXT.attr(), &[self.config.realm.as_str()]),
            ]);
            self.store.put_record(&zone, "_kerberos", kerberos)?;
        }

        if let Some(address) = glue {
            self.add_glue_record(&zone, &qualified_ns, address)?;
        }

        info!("created DNS zone {}", zone);
        let entry = self.store.get_zone(&zone).ok_or_else(|| zone_not_found(&zone))?;
        Ok(OpResult {
            value: zone,
            summary: None,
            result: entry,
        })
    }

    fn initial_zone_entry(
        &self,
        zone: &str,
        nameserver: &str,
        admin_email: &str,
        reverse_zone: bool,
    ) -> Entry {
        let policy = if reverse_zone {
            format!(
                "grant {} krb5-subdomain {} PTR;",
                self.config.realm, zone
            )
        } else {
            format!(
                "grant {realm} krb5-self * A; grant {realm} krb5-self * AAAA; \
                 grant {realm} krb5-self * SSHFP;",
                realm = self.config.realm
            )
        };

        let mut entry = Entry::new();
        let mut set = |attr: &str, value: String| {
            entry.insert(attr.to_string(), vec![value]);
        };
        set(attrs::IDNS_NAME, zone.to_string());
        set(attrs::ZONE_ACTIVE, constants::TRUE.to_string());
        set(attrs::SOA_MNAME, nameserver.to_string());
        set(RecordType::NS.attr(), nameserver.to_string());
        set(attrs::SOA_RNAME, admin_email.to_string());
        set(attrs::SOA_SERIAL, generate_serial().to_string());
        set(attrs::SOA_REFRESH, self.config.soa_refresh.to_string());
        set(attrs::SOA_RETRY, self.config.soa_retry.to_string());
        set(attrs::SOA_EXPIRE, self.config.soa_expire.to_string());
        set(attrs::SOA_MINIMUM, self.config.soa_minimum.to_string());
        set(attrs::ALLOW_DYNUPDATE, constants::FALSE.to_string());
        set(attrs::UPDATE_POLICY, policy);
        set(
            attrs::ALLOW_TRANSFER,
            constants::DEFAULT_ALLOW_TRANSFER.to_string(),
        );
        set(
            attrs::ALLOW_QUERY,
            constants::DEFAULT_ALLOW_QUERY.to_string(),
        );
        entry
    }

    /// Create the nameserver's A/AAAA glue inside the new zone.
    fn add_glue_record(&self, zone: &str, qualified_ns: &str, address: IpAddr) -> Result<()> {
        let attr = match address {
            IpAddr::V4(_) => RecordType::A.attr(),
            IpAddr::V6(_) => RecordType::AAAA.attr(),
        };
        let Some(relative) = name::relative_name(qualified_ns, zone) else {
            return Ok(());
        };
        debug!("adding glue {} for {}", address, qualified_ns);
        if relative == name::ROOT_NAME {
            let mut entry = self.store.get_zone(zone).ok_or_else(|| zone_not_found(zone))?;
            entry
                .entry(attr.to_string())
                .or_default()
                .push(address.to_string());
            self.store.put_zone(zone, entry)
        } else {
            let mut entry = self
                .store
                .get_record(zone, &relative)
                .unwrap_or_else(|| {
                    crate::store::entry_from(&[(attrs::IDNS_NAME, &[relative.as_str()])])
                });
            entry
                .entry(attr.to_string())
                .or_default()
                .push(address.to_string());
            self.store.put_record(zone, &relative, entry)
        }
    }

    /// Apply attribute deltas to a zone.
    pub fn modify(&self, zone: &str, delta: ZoneDelta) -> Result<OpResult<Entry>> {
        let mut entry = self
            .store
            .get_zone(zone)
            .ok_or_else(|| zone_not_found(zone))?;
        if delta.is_empty() {
            return Err(DnsError::EmptyModlist);
        }
        for (attr, update) in &delta {
            match update {
                None => {
                    known_zone_attr(attr)?;
                    entry.remove(attr);
                }
                Some(values) => {
                    let canonical = validate_zone_attr(attr, values)?;
                    entry.insert(attr.clone(), canonical);
                }
            }
        }
        self.store.put_zone(zone, entry.clone())?;
        debug!("modified DNS zone {}", zone);
        Ok(OpResult {
            value: zone.to_string(),
            summary: None,
            result: entry,
        })
    }

    /// Retrieve a zone entry.
    pub fn show(&self, zone: &str) -> Result<OpResult<Entry>> {
        let entry = self
            .store
            .get_zone(zone)
            .ok_or_else(|| zone_not_found(zone))?;
        Ok(OpResult {
            value: zone.to_string(),
            summary: None,
            result: entry,
        })
    }

    /// Search zones by attribute substring match.
    pub fn find(
        &self,
        filters: &BTreeMap<String, String>,
        forward_only: bool,
    ) -> Result<FindResult> {
        let mut results = Vec::new();
        for (key, entry) in self.store.list_zones() {
            if forward_only && name::is_reverse_zone(&key) {
                continue;
            }
            let matched = filters.iter().all(|(attr, needle)| {
                entry
                    .get(attr)
                    .is_some_and(|values| values.iter().any(|v| v.contains(needle.as_str())))
            });
            if matched {
                results.push(entry);
            }
        }
        Ok(FindResult::new(results))
    }

    /// Delete a zone, its records, and its managed permission.
    pub fn delete(&self, zone: &str) -> Result<OpResult<DeleteStatus>> {
        if !self.store.zone_exists(zone) {
            return Err(zone_not_found(zone));
        }
        // Two-phase: records first, then the zone entry itself
        for (record, _) in self.store.list_records(zone) {
            self.store.delete_record(zone, &record)?;
        }
        self.store.delete_zone(zone)?;
        match self.permissions.revoke(&zone_permission_name(zone)) {
            Ok(()) | Err(DnsError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        info!("deleted DNS zone {}", zone);
        Ok(OpResult {
            value: zone.to_string(),
            summary: Some(format!("Deleted DNS zone \"{}\"", zone)),
            result: DeleteStatus::clean(),
        })
    }

    /// Mark a zone active.
    pub fn enable(&self, zone: &str) -> Result<OpResult<bool>> {
        self.set_active(zone, true)
    }

    /// Mark a zone disabled; its data stays in place.
    pub fn disable(&self, zone: &str) -> Result<OpResult<bool>> {
        self.set_active(zone, false)
    }

    fn set_active(&self, zone: &str, active: bool) -> Result<OpResult<bool>> {
        let mut entry = self
            .store
            .get_zone(zone)
            .ok_or_else(|| zone_not_found(zone))?;
        let flag = if active {
            constants::TRUE
        } else {
            constants::FALSE
        };
        entry.insert(attrs::ZONE_ACTIVE.to_string(), vec![flag.to_string()]);
        self.store.put_zone(zone, entry)?;
        let summary = if active {
            format!("Enabled DNS zone \"{}\"", zone)
        } else {
            format!("Disabled DNS zone \"{}\"", zone)
        };
        info!("{}", summary);
        Ok(OpResult {
            value: zone.to_string(),
            summary: Some(summary),
            result: true,
        })
    }

    /// Grant the managed per-zone permission.
    pub fn add_permission(&self, zone: &str) -> Result<OpResult<bool>> {
        if !self.store.zone_exists(zone) {
            return Err(zone_not_found(zone));
        }
        let permission = zone_permission_name(zone);
        let spec = crate::store::entry_from(&[
            ("cn", &[permission.as_str()]),
            ("ipapermissiontype", &["SYSTEM"]),
        ]);
        self.permissions.grant(&permission, spec)?;
        Ok(OpResult {
            value: permission.clone(),
            summary: Some(format!("Added system permission \"{}\"", permission)),
            result: true,
        })
    }

    /// Revoke the managed per-zone permission; absent permissions are fine.
    pub fn remove_permission(&self, zone: &str) -> Result<OpResult<bool>> {
        if !self.store.zone_exists(zone) {
            return Err(zone_not_found(zone));
        }
        let permission = zone_permission_name(zone);
        match self.permissions.revoke(&permission) {
            Ok(()) | Err(DnsError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        Ok(OpResult {
            value: permission.clone(),
            summary: Some(format!("Removed system permission \"{}\"", permission)),
            result: true,
        })
    }
}

/// Date-based serial, YYYYMMDDNN form with room for two daily digits.
fn generate_serial() -> u32 {
    let now = Local::now();
    now.year() as u32 * 1_000_000 + now.month() * 10_000 + now.day() * 100
}

/// Option name used in error fields for a zone attribute.
fn cli_name(attr: &str) -> &str {
    match attr {
        attrs::SOA_SERIAL => "serial",
        attrs::SOA_REFRESH => "refresh",
        attrs::SOA_RETRY => "retry",
        attrs::SOA_EXPIRE => "expire",
        attrs::SOA_MINIMUM => "minimum",
        attrs::ALLOW_QUERY => "allow_query",
        attrs::ALLOW_TRANSFER => "allow_transfer",
        attrs::ALLOW_DYNUPDATE => "allow_dynupdate",
        attrs::ZONE_ACTIVE => "zone_active",
        attrs::SOA_MNAME => "name_server",
        attrs::SOA_RNAME => "admin_email",
        attrs::UPDATE_POLICY => "update_policy",
        other => other,
    }
}

fn known_zone_attr(attr: &str) -> Result<()> {
    const KNOWN: &[&str] = &[
        attrs::SOA_MNAME,
        attrs::SOA_RNAME,
        attrs::SOA_SERIAL,
        attrs::SOA_REFRESH,
        attrs::SOA_RETRY,
        attrs::SOA_EXPIRE,
        attrs::SOA_MINIMUM,
        attrs::ALLOW_DYNUPDATE,
        attrs::UPDATE_POLICY,
        attrs::ALLOW_TRANSFER,
        attrs::ALLOW_QUERY,
        attrs::ZONE_ACTIVE,
    ];
    if KNOWN.contains(&attr) {
        Ok(())
    } else {
        Err(DnsError::validation(attr, "unknown option"))
    }
}

fn validate_zone_attr(attr: &str, values: &[String]) -> Result<Vec<String>> {
    known_zone_attr(attr)?;
    match attr {
        attrs::SOA_SERIAL
        | attrs::SOA_REFRESH
        | attrs::SOA_RETRY
        | attrs::SOA_EXPIRE
        | attrs::SOA_MINIMUM => values
            .iter()
            .map(|value| parse_u32(cli_name(attr), value).map(|n| n.to_string()))
            .collect(),
        attrs::ALLOW_QUERY | attrs::ALLOW_TRANSFER => values
            .iter()
            .map(|value| acl::canonicalize(cli_name(attr), value))
            .collect(),
        attrs::ALLOW_DYNUPDATE | attrs::ZONE_ACTIVE => {
            for value in values {
                if value != constants::TRUE && value != constants::FALSE {
                    return Err(DnsError::validation(cli_name(attr), "must be TRUE or FALSE"));
                }
            }
            Ok(values.to_vec())
        }
        attrs::SOA_MNAME => {
            for value in values {
                name::validate_name(value, false).map_err(|_| {
                    DnsError::validation(cli_name(attr), name::domain_name_message(false))
                })?;
            }
            Ok(values.to_vec())
        }
        _ => Ok(values.to_vec()),
    }
}

/// Parse an unsigned 32-bit attribute value; serials go up to 4294967295.
fn parse_u32(field: &str, value: &str) -> Result<u32> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(DnsError::validation(field, "must be an integer"));
    }
    value
        .parse()
        .map_err(|_| DnsError::validation(field, "can be at most 4294967295"))
}
