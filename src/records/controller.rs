//! Record set operations: add, modify, delete, find, show.
//!
//! A record lives at `(zone, name)`; the root name `@` shares the zone's own
//! entry. Every mutation builds the would-be record set in memory, runs the
//! validator over it, and only then writes, so failures never half-apply.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, info};

use super::codec;
use super::parts::PartsPatch;
use super::types::RecordType;
use super::validator;
use crate::api::{DeleteOutcome, DeleteStatus, FindResult, OpResult, RecordView, StructuredRecord};
use crate::error::{DnsError, Result};
use crate::name;
use crate::resolver::NameResolver;
use crate::store::{DirectoryStore, Entry};
use crate::zone::{attrs, reverse, zone_not_found};

/// The not-found error for a missing record name.
pub fn record_not_found(record: &str) -> DnsError {
    DnsError::not_found(format!("{}: DNS resource record not found", record))
}

/// Incoming record values: raw per type, or typed part fields.
///
/// Supplying both a raw value and part fields for the same type in one add
/// is rejected; in a modify, the raw value selects which stored value the
/// parts apply to.
#[derive(Debug, Clone, Default)]
pub struct RecordChange {
    pub raw: BTreeMap<RecordType, Vec<String>>,
    pub parts: Vec<PartsPatch>,
}

impl RecordChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(mut self, rtype: RecordType, value: impl Into<String>) -> Self {
        self.raw.entry(rtype).or_default().push(value.into());
        self
    }

    pub fn with_parts(mut self, patch: PartsPatch) -> Self {
        self.parts.push(patch);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.parts.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordAddOptions {
    /// Skip the nameserver resolvability check.
    pub force: bool,
    /// Also create a PTR record in the matching reverse zone for each
    /// added A/AAAA value.
    pub create_reverse: bool,
}

/// Inputs to a record modify.
#[derive(Debug, Clone, Default)]
pub struct RecordModify {
    pub change: RecordChange,
    /// Record types to drop entirely.
    pub clear: Vec<RecordType>,
    /// Move every value of this name to a new name within the zone.
    pub rename: Option<String>,
    pub force: bool,
}

/// Inputs to a record delete.
#[derive(Debug, Clone, Default)]
pub struct RecordDelete {
    pub values: BTreeMap<RecordType, Vec<String>>,
    pub del_all: bool,
}

impl RecordDelete {
    pub fn all() -> Self {
        RecordDelete {
            del_all: true,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, rtype: RecordType, value: impl Into<String>) -> Self {
        self.values.entry(rtype).or_default().push(value.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Decompose each value into its typed parts.
    pub structured: bool,
    /// Return the full stored entry instead of the record view.
    pub all: bool,
}

/// Orchestrates record operations atop a zone's record set.
pub struct RecordSetController {
    store: Arc<dyn DirectoryStore>,
    resolver: Arc<dyn NameResolver>,
}

impl RecordSetController {
    pub fn new(store: Arc<dyn DirectoryStore>, resolver: Arc<dyn NameResolver>) -> Self {
        Self { store, resolver }
    }

    /// Add record values to a name, creating the name as needed.
    pub fn add(
        &self,
        zone: &str,
        record: &str,
        change: RecordChange,
        options: RecordAddOptions,
    ) -> Result<OpResult<Entry>> {
        self.require_zone(zone)?;
        validator::validate_record_name(record)?;
        if change.is_empty() {
            return Err(DnsError::EmptyModlist);
        }
        let root = record == name::ROOT_NAME;

        let incoming = decode_change(&change)?;

        let mut entry = match self.fetch_entry(zone, record) {
            Some(entry) => entry,
            None => crate::store::entry_from(&[(attrs::IDNS_NAME, &[record])]),
        };
        for (rtype, values) in &incoming {
            let stored = entry.entry(rtype.attr().to_string()).or_default();
            for value in values {
                if !stored.contains(value) {
                    stored.push(value.clone());
                }
            }
        }

        validator::check_exclusivity(&entry, root)?;
        if let Some(ns_values) = incoming.get(&RecordType::NS) {
            validator::check_nameservers(self.resolver.as_ref(), zone, ns_values, options.force)?;
        }

        // Work the reverse side out before writing anything
        let mut pending_reverse = Vec::new();
        if options.create_reverse {
            for rtype in [RecordType::A, RecordType::AAAA] {
                for value in incoming.get(&rtype).into_iter().flatten() {
                    pending_reverse.push(self.prepare_reverse(zone, record, value)?);
                }
            }
        }

        self.persist(zone, record, entry.clone())?;
        for (rev_zone, rev_record, hostname) in pending_reverse {
            let ptr = crate::store::entry_from(&[
                (attrs::IDNS_NAME, &[rev_record.as_str()]),
                (RecordType::PTR.attr(), &[hostname.as_str()]),
            ]);
            debug!("created reverse record {} in {}", rev_record, rev_zone);
            self.store.put_record(&rev_zone, &rev_record, ptr)?;
        }

        Ok(OpResult {
            value: record.to_string(),
            summary: None,
            result: record_view(&entry, root),
        })
    }

    /// Modify a name's record values, optionally renaming the name.
    pub fn modify(
        &self,
        zone: &str,
        record: &str,
        modify: RecordModify,
    ) -> Result<OpResult<Entry>> {
        self.require_zone(zone)?;
        validator::validate_record_name(record)?;
        let root = record == name::ROOT_NAME;
        let mut entry = self
            .fetch_entry(zone, record)
            .ok_or_else(|| record_not_found(record))?;
        if modify.change.is_empty() && modify.clear.is_empty() && modify.rename.is_none() {
            return Err(DnsError::EmptyModlist);
        }

        // Part fields first: they edit one stored value in place, selected
        // by the raw value supplied alongside them
        for patch in &modify.change.parts {
            let rtype = patch.record_type();
            let Some(targets) = modify.change.raw.get(&rtype) else {
                return Err(DnsError::requirement(rtype.attr()));
            };
            for target in targets {
                let canonical = codec::canonicalize(rtype, target)?;
                let position = entry
                    .get(rtype.attr())
                    .and_then(|values| values.iter().position(|v| *v == canonical))
                    .ok_or_else(|| {
                        DnsError::attr_value_not_found(rtype.display_name(), target.clone())
                    })?;
                let updated = patch.apply(codec::decode(rtype, &canonical)?)?;
                if let Some(values) = entry.get_mut(rtype.attr()) {
                    values[position] = codec::encode(&updated);
                }
            }
        }

        // Raw-only types replace their value set wholesale
        for (rtype, values) in &modify.change.raw {
            if modify.change.parts.iter().any(|p| p.record_type() == *rtype) {
                continue;
            }
            let canonical: Vec<String> = values
                .iter()
                .map(|value| codec::canonicalize(*rtype, value))
                .collect::<Result<_>>()?;
            entry.insert(rtype.attr().to_string(), canonical);
        }
        for rtype in &modify.clear {
            entry.remove(rtype.attr());
        }

        validator::check_exclusivity(&entry, root)?;
        if let Some(ns_values) = entry.get(RecordType::NS.attr()) {
            if modify.change.raw.contains_key(&RecordType::NS) {
                validator::check_nameservers(
                    self.resolver.as_ref(),
                    zone,
                    ns_values,
                    modify.force,
                )?;
            }
        }

        let result_name = match &modify.rename {
            Some(new_name) => {
                if root {
                    return Err(DnsError::validation(
                        "rename",
                        "DNS zone root record cannot be renamed",
                    ));
                }
                name::validate_name(new_name, true)
                    .map_err(|msg| DnsError::validation("rename", msg))?;
                if self.fetch_entry(zone, new_name).is_some() {
                    return Err(DnsError::duplicate(format!(
                        "DNS resource record with name \"{}\" already exists",
                        new_name
                    )));
                }
                entry.insert(attrs::IDNS_NAME.to_string(), vec![new_name.clone()]);
                self.store.delete_record(zone, record)?;
                self.store.put_record(zone, new_name, entry.clone())?;
                info!("renamed record {} to {} in {}", record, new_name, zone);
                new_name.clone()
            }
            None => {
                if record_value_count(&entry) == 0 && !root {
                    self.store.delete_record(zone, record)?;
                } else {
                    self.persist(zone, record, entry.clone())?;
                }
                record.to_string()
            }
        };

        let mut view = record_view(&entry, root);
        view.insert(attrs::IDNS_NAME.to_string(), vec![result_name]);
        Ok(OpResult {
            value: record.to_string(),
            summary: None,
            result: view,
        })
    }

    /// Remove record values, or the whole name with `del_all`.
    pub fn delete(
        &self,
        zone: &str,
        record: &str,
        delete: RecordDelete,
    ) -> Result<OpResult<DeleteOutcome>> {
        self.require_zone(zone)?;
        let root = record == name::ROOT_NAME;
        if delete.del_all && root {
            return Err(DnsError::validation(
                "del_all",
                "Zone record '@' cannot be deleted",
            ));
        }
        let mut entry = self
            .fetch_entry(zone, record)
            .ok_or_else(|| record_not_found(record))?;

        if delete.del_all {
            self.store.delete_record(zone, record)?;
            info!("deleted record {} in {}", record, zone);
            return Ok(OpResult {
                value: record.to_string(),
                summary: Some(format!("Deleted record \"{}\"", record)),
                result: DeleteOutcome::Removed(DeleteStatus::clean()),
            });
        }
        if delete.values.is_empty() {
            return Err(DnsError::EmptyModlist);
        }

        for (rtype, values) in &delete.values {
            for value in values {
                let canonical =
                    codec::canonicalize(*rtype, value).unwrap_or_else(|_| value.clone());
                let position = entry
                    .get(rtype.attr())
                    .and_then(|stored| stored.iter().position(|v| *v == canonical))
                    .ok_or_else(|| {
                        DnsError::attr_value_not_found(rtype.display_name(), value.clone())
                    })?;
                if let Some(stored) = entry.get_mut(rtype.attr()) {
                    stored.remove(position);
                    if stored.is_empty() {
                        entry.remove(rtype.attr());
                    }
                }
            }
        }

        if record_value_count(&entry) == 0 && !root {
            self.store.delete_record(zone, record)?;
            info!("deleted record {} in {}", record, zone);
            Ok(OpResult {
                value: record.to_string(),
                summary: Some(format!("Deleted record \"{}\"", record)),
                result: DeleteOutcome::Removed(DeleteStatus::clean()),
            })
        } else {
            self.persist(zone, record, entry.clone())?;
            Ok(OpResult {
                value: record.to_string(),
                summary: None,
                result: DeleteOutcome::Remaining(record_view(&entry, root)),
            })
        }
    }

    /// Search a zone's names by record attribute substring match.
    pub fn find(&self, zone: &str, filters: &BTreeMap<String, String>) -> Result<FindResult> {
        self.require_zone(zone)?;
        let mut results = Vec::new();

        let matches = |view: &Entry| {
            filters.iter().all(|(attr, needle)| {
                view.get(attr)
                    .is_some_and(|values| values.iter().any(|v| v.contains(needle.as_str())))
            })
        };

        if let Some(entry) = self.store.get_zone(zone) {
            let view = record_view(&entry, true);
            if matches(&view) {
                results.push(view);
            }
        }
        for (_, entry) in self.store.list_records(zone) {
            let view = record_view(&entry, false);
            if matches(&view) {
                results.push(view);
            }
        }
        Ok(FindResult::new(results))
    }

    /// Retrieve one name's records, raw or decomposed.
    pub fn show(
        &self,
        zone: &str,
        record: &str,
        options: ShowOptions,
    ) -> Result<OpResult<RecordView>> {
        self.require_zone(zone)?;
        let root = record == name::ROOT_NAME;
        let entry = self
            .fetch_entry(zone, record)
            .ok_or_else(|| record_not_found(record))?;

        let dnsrecords = if options.structured {
            Some(structured_records(&entry)?)
        } else {
            None
        };
        let view = if options.all {
            entry
        } else {
            record_view(&entry, root)
        };
        Ok(OpResult {
            value: record.to_string(),
            summary: None,
            result: RecordView {
                entry: view,
                dnsrecords,
            },
        })
    }

    fn require_zone(&self, zone: &str) -> Result<()> {
        if !self.store.zone_exists(zone) {
            return Err(zone_not_found(zone));
        }
        Ok(())
    }

    /// The stored entry backing a name; the root shares the zone entry.
    fn fetch_entry(&self, zone: &str, record: &str) -> Option<Entry> {
        if record == name::ROOT_NAME {
            self.store.get_zone(zone)
        } else {
            self.store.get_record(zone, record)
        }
    }

    fn persist(&self, zone: &str, record: &str, entry: Entry) -> Result<()> {
        if record == name::ROOT_NAME {
            self.store.put_zone(zone, entry)
        } else {
            self.store.put_record(zone, record, entry)
        }
    }

    /// Locate the reverse zone for an address and stage the PTR write.
    fn prepare_reverse(
        &self,
        zone: &str,
        record: &str,
        address: &str,
    ) -> Result<(String, String, String)> {
        let parsed: IpAddr = address
            .parse()
            .map_err(|_| DnsError::validation("a_rec", "invalid IP address format"))?;

        let mut best: Option<(String, String, String)> = None;
        for (key, entry) in self.store.list_zones() {
            if !name::is_reverse_zone(&key) {
                continue;
            }
            let Some(rev_record) = reverse::record_name_in_zone(parsed, &key) else {
                continue;
            };
            let display = entry
                .get(attrs::IDNS_NAME)
                .and_then(|values| values.first())
                .cloned()
                .unwrap_or_else(|| key.clone());
            let longer = best.as_ref().is_none_or(|(current, _, _)| key.len() > current.len());
            if longer {
                best = Some((key, rev_record, display));
            }
        }
        let Some((rev_zone, rev_record, display)) = best else {
            return Err(DnsError::not_found(format!(
                "DNS reverse zone for IP address {} not found",
                address
            )));
        };

        let existing_ptr = self
            .store
            .get_record(&rev_zone, &rev_record)
            .and_then(|entry| entry.get(RecordType::PTR.attr()).cloned())
            .is_some_and(|values| !values.is_empty());
        if existing_ptr {
            return Err(DnsError::duplicate(format!(
                "Reverse record for IP address {} already exists in reverse zone {}.",
                address, display
            )));
        }

        let hostname = if record == name::ROOT_NAME {
            name::ensure_fqdn(&name::zone_key(zone))
        } else {
            name::qualify(record, zone)
        };
        Ok((rev_zone, rev_record, hostname))
    }
}

/// Number of record values an entry holds across all types.
fn record_value_count(entry: &Entry) -> usize {
    RecordType::all()
        .iter()
        .map(|rtype| entry.get(rtype.attr()).map_or(0, Vec::len))
        .sum()
}

/// The record-facing view of an entry: its name plus record attributes.
///
/// The root name's backing entry is the zone entry; the view renames it to
/// `@` and hides the zone attributes.
fn record_view(entry: &Entry, root: bool) -> Entry {
    let mut view = Entry::new();
    let record_name = if root {
        name::ROOT_NAME.to_string()
    } else {
        entry
            .get(attrs::IDNS_NAME)
            .and_then(|values| values.first())
            .cloned()
            .unwrap_or_default()
    };
    view.insert(attrs::IDNS_NAME.to_string(), vec![record_name]);
    for rtype in RecordType::all() {
        if let Some(values) = entry.get(rtype.attr()) {
            if !values.is_empty() {
                view.insert(rtype.attr().to_string(), values.clone());
            }
        }
    }
    view
}

/// Decompose every stored value for the structured show view.
fn structured_records(entry: &Entry) -> Result<Vec<StructuredRecord>> {
    let mut records = Vec::new();
    for rtype in RecordType::all() {
        for value in entry.get(rtype.attr()).into_iter().flatten() {
            let parts = codec::decode(*rtype, value)?;
            records.push(StructuredRecord {
                dnstype: rtype.to_string(),
                dnsdata: value.clone(),
                parts: parts.part_fields().into_iter().collect(),
            });
        }
    }
    Ok(records)
}

/// Decode and canonicalize an add's values; parts become raw text.
///
/// A raw value and part fields for the same type are mutually exclusive
/// here; a modify routes its parts through the in-place edit path instead.
fn decode_change(change: &RecordChange) -> Result<BTreeMap<RecordType, Vec<String>>> {
    let mut incoming: BTreeMap<RecordType, Vec<String>> = BTreeMap::new();
    for (rtype, values) in &change.raw {
        for value in values {
            incoming
                .entry(*rtype)
                .or_default()
                .push(codec::canonicalize(*rtype, value)?);
        }
    }
    for patch in &change.parts {
        let rtype = patch.record_type();
        if change.raw.contains_key(&rtype) {
            return Err(DnsError::validation(
                patch.conflict_field(),
                format!(
                    "Raw value of a DNS record was already set by \"{}\" option",
                    rtype.rec_option()
                ),
            ));
        }
        let parts = patch.complete()?;
        incoming.entry(rtype).or_default().push(codec::encode(&parts));
    }
    Ok(incoming)
}
