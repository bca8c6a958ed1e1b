//! Engine configuration and the global forwarder settings.
//!
//! `EngineConfig` is handed to the lifecycle at construction: the Kerberos
//! realm used in synthesized update policies and the default SOA timers.
//! `GlobalConfig` fronts the directory-backed forwarder singleton, which is
//! mutated only through `modify` and never by zone operations.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::OpResult;
use crate::error::{ConfigError, DnsError, Result};
use crate::store::{DirectoryStore, Entry};
use crate::zone::{attrs, constants};

/// Static engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Kerberos realm granted in synthesized update policies.
    pub realm: String,

    /// Default SOA refresh for new zones.
    #[serde(default = "default_soa_refresh")]
    pub soa_refresh: u32,

    /// Default SOA retry for new zones.
    #[serde(default = "default_soa_retry")]
    pub soa_retry: u32,

    /// Default SOA expire for new zones.
    #[serde(default = "default_soa_expire")]
    pub soa_expire: u32,

    /// Default SOA minimum for new zones.
    #[serde(default = "default_soa_minimum")]
    pub soa_minimum: u32,
}

fn default_soa_refresh() -> u32 {
    constants::DEFAULT_SOA_REFRESH
}

fn default_soa_retry() -> u32 {
    constants::DEFAULT_SOA_RETRY
}

fn default_soa_expire() -> u32 {
    constants::DEFAULT_SOA_EXPIRE
}

fn default_soa_minimum() -> u32 {
    constants::DEFAULT_SOA_MINIMUM
}

impl EngineConfig {
    pub fn new(realm: impl Into<String>) -> Self {
        EngineConfig {
            realm: realm.into(),
            soa_refresh: default_soa_refresh(),
            soa_retry: default_soa_retry(),
            soa_expire: default_soa_expire(),
            soa_minimum: default_soa_minimum(),
        }
    }

    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Forward policies the global config accepts.
pub const FORWARD_POLICIES: &[&str] = &["first", "only"];

/// Attribute deltas for the global config; `None` clears an attribute.
pub type ConfigDelta = BTreeMap<String, Option<Vec<String>>>;

/// Controller for the directory-backed forwarder configuration.
pub struct GlobalConfig {
    store: Arc<dyn DirectoryStore>,
}

impl GlobalConfig {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Apply attribute deltas to the global forwarder settings.
    pub fn modify(&self, delta: ConfigDelta) -> Result<OpResult<Entry>> {
        if delta.is_empty() {
            return Err(DnsError::EmptyModlist);
        }
        let mut entry = self.store.get_config();
        for (attr, update) in &delta {
            match update {
                None => {
                    entry.remove(attr);
                }
                Some(values) => {
                    validate_config_attr(attr, values)?;
                    entry.insert(attr.clone(), values.clone());
                }
            }
        }
        info!("updated global DNS configuration");
        self.store.put_config(entry.clone());
        Ok(OpResult {
            value: String::new(),
            summary: None,
            result: entry,
        })
    }
}

fn validate_config_attr(attr: &str, values: &[String]) -> Result<()> {
    match attr {
        attrs::FORWARDERS => {
            for value in values {
                value.parse::<IpAddr>().map_err(|_| {
                    DnsError::validation("forwarder", "invalid IP address format")
                })?;
            }
            Ok(())
        }
        attrs::FORWARD_POLICY => {
            for value in values {
                if !FORWARD_POLICIES.contains(&value.as_str()) {
                    return Err(DnsError::validation(
                        "forward_policy",
                        "must be \"first\" or \"only\"",
                    ));
                }
            }
            Ok(())
        }
        attrs::ALLOW_SYNC_PTR => {
            for value in values {
                if value != constants::TRUE && value != constants::FALSE {
                    return Err(DnsError::validation(
                        "allow_sync_ptr",
                        "must be TRUE or FALSE",
                    ));
                }
            }
            Ok(())
        }
        _ => Err(DnsError::validation(attr, "unknown option")),
    }
}
