//! Semantic checks over a name's merged record set.
//!
//! The controller merges existing and incoming values first; the checks here
//! run against the would-be result, so a rejected operation never leaves a
//! half-applied record set behind.

use super::types::RecordType;
use crate::error::{DnsError, Result};
use crate::name;
use crate::resolver::NameResolver;
use crate::store::Entry;

const CNAME_COEXISTENCE: &str =
    "CNAME record is not allowed to coexist with any other record (RFC 1034, section 3.6.2)";
const CNAME_SINGLE: &str = "only one CNAME record is allowed per name (RFC 2136, section 1.1.5)";
const DNAME_SINGLE: &str = "only one DNAME record is allowed per name (RFC 6672, section 2.4)";
const DNAME_NS_COEXISTENCE: &str = "DNAME record is not allowed to coexist with an NS record \
     except when located in a zone root record (RFC 6672, section 2.3)";

/// Validate a record owner name; `@` is the root sentinel and always passes.
pub fn validate_record_name(record_name: &str) -> Result<()> {
    if record_name == name::ROOT_NAME {
        return Ok(());
    }
    name::validate_name(record_name, true).map_err(|msg| DnsError::validation("name", msg))
}

/// Validate a zone name (underscore labels are not allowed here).
pub fn validate_zone_name(zone_name: &str) -> Result<()> {
    name::validate_name(zone_name, false).map_err(|msg| DnsError::validation("name", msg))
}

fn value_count(entry: &Entry, rtype: RecordType) -> usize {
    entry.get(rtype.attr()).map_or(0, Vec::len)
}

/// Enforce CNAME and DNAME exclusivity over a would-be record set.
pub fn check_exclusivity(entry: &Entry, is_root: bool) -> Result<()> {
    let cname = value_count(entry, RecordType::CNAME);
    if cname > 0 {
        let other_types = RecordType::all()
            .iter()
            .filter(|t| **t != RecordType::CNAME)
            .any(|t| value_count(entry, *t) > 0);
        if other_types {
            return Err(DnsError::validation(
                RecordType::CNAME.attr(),
                CNAME_COEXISTENCE,
            ));
        }
        if cname > 1 {
            return Err(DnsError::validation(RecordType::CNAME.attr(), CNAME_SINGLE));
        }
    }

    let dname = value_count(entry, RecordType::DNAME);
    if dname > 1 {
        return Err(DnsError::validation(RecordType::DNAME.attr(), DNAME_SINGLE));
    }
    if dname > 0 && value_count(entry, RecordType::NS) > 0 && !is_root {
        return Err(DnsError::validation(
            RecordType::DNAME.attr(),
            DNAME_NS_COEXISTENCE,
        ));
    }

    Ok(())
}

/// The not-found message for an unresolvable nameserver.
pub fn nameserver_not_found(qualified: &str) -> String {
    format!(
        "Nameserver '{}' does not have a corresponding A/AAAA record",
        qualified
    )
}

/// Require each nameserver value to resolve to an A/AAAA record.
///
/// Relative names are qualified against the owning zone before the lookup.
/// `force` bypasses the check wholesale.
pub fn check_nameservers(
    resolver: &dyn NameResolver,
    zone: &str,
    values: &[String],
    force: bool,
) -> Result<()> {
    if force {
        return Ok(());
    }
    for value in values {
        let qualified = name::qualify(value, zone);
        if !resolver.has_address_record(&qualified) {
            return Err(DnsError::not_found(nameserver_not_found(&qualified)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FixedResolver;

    fn entry(values: &[(RecordType, &[&str])]) -> Entry {
        let mut entry = Entry::new();
        for (rtype, vals) in values {
            entry.insert(
                rtype.attr().to_string(),
                vals.iter().map(|v| v.to_string()).collect(),
            );
        }
        entry
    }

    #[test]
    fn test_cname_rejects_coexistence() {
        let entry = entry(&[
            (RecordType::CNAME, &["foo-1.example.com."]),
            (RecordType::A, &["172.16.29.111"]),
        ]);
        let err = check_exclusivity(&entry, false).unwrap_err();
        assert_eq!(err, DnsError::validation("cnamerecord", CNAME_COEXISTENCE));
    }

    #[test]
    fn test_cname_rejects_multiple_values() {
        let entry = entry(&[(RecordType::CNAME, &["1.example.com.", "2.example.com."])]);
        let err = check_exclusivity(&entry, false).unwrap_err();
        assert_eq!(err, DnsError::validation("cnamerecord", CNAME_SINGLE));
    }

    #[test]
    fn test_cname_never_coexists_for_any_other_type() {
        for rtype in RecordType::all() {
            if *rtype == RecordType::CNAME {
                continue;
            }
            let entry = entry(&[
                (RecordType::CNAME, &["foo-1.example.com."]),
                (*rtype, &["x"]),
            ]);
            let err = check_exclusivity(&entry, false).unwrap_err();
            assert_eq!(
                err,
                DnsError::validation("cnamerecord", CNAME_COEXISTENCE),
                "type {} should conflict with CNAME",
                rtype
            );
        }
    }

    #[test]
    fn test_dname_rejects_multiple_values() {
        let entry = entry(&[(
            RecordType::DNAME,
            &["foo-1.example.com.", "foo-2.example.com."],
        )]);
        let err = check_exclusivity(&entry, false).unwrap_err();
        assert_eq!(err, DnsError::validation("dnamerecord", DNAME_SINGLE));
    }

    #[test]
    fn test_dname_ns_only_at_root() {
        let entry = entry(&[
            (RecordType::DNAME, &["d.example.com."]),
            (RecordType::NS, &["ns1.dnszone.test."]),
        ]);
        let err = check_exclusivity(&entry, false).unwrap_err();
        assert_eq!(err, DnsError::validation("dnamerecord", DNAME_NS_COEXISTENCE));

        // The same set is fine in a zone root record
        assert!(check_exclusivity(&entry, true).is_ok());
    }

    #[test]
    fn test_dname_coexists_with_address_records() {
        let entry = entry(&[
            (RecordType::DNAME, &["d.example.com."]),
            (RecordType::A, &["172.16.29.111"]),
        ]);
        assert!(check_exclusivity(&entry, false).is_ok());
    }

    #[test]
    fn test_nameserver_check_qualifies_relative_names() {
        let resolver = FixedResolver::default();
        let err = check_nameservers(
            &resolver,
            "dnszone.test",
            &["does.not.exist".to_string()],
            false,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DnsError::not_found(
                "Nameserver 'does.not.exist.dnszone.test.' does not have a \
                 corresponding A/AAAA record"
            )
        );
    }

    #[test]
    fn test_nameserver_check_force_bypasses() {
        let resolver = FixedResolver::default();
        assert!(
            check_nameservers(
                &resolver,
                "dnszone.test",
                &["does.not.exist.".to_string()],
                true
            )
            .is_ok()
        );
    }

    #[test]
    fn test_nameserver_check_passes_when_resolvable() {
        let resolver = FixedResolver::default();
        resolver.insert("ns1.dnszone.test.");
        assert!(
            check_nameservers(
                &resolver,
                "dnszone.test",
                &["ns1.dnszone.test.".to_string()],
                false
            )
            .is_ok()
        );
    }

    #[test]
    fn test_record_name_charset() {
        assert!(validate_record_name("@").is_ok());
        assert!(validate_record_name("_foo._tcp").is_ok());
        let err = validate_record_name("invalid record").unwrap_err();
        assert_eq!(
            err,
            DnsError::validation(
                "name",
                "only letters, numbers, _, and - are allowed. \
                 DNS label may not start or end with -"
            )
        );
    }

    #[test]
    fn test_zone_name_charset() {
        let err = validate_zone_name("invalid zone").unwrap_err();
        assert_eq!(
            err,
            DnsError::validation(
                "name",
                "only letters, numbers, and - are allowed. \
                 DNS label may not start or end with -"
            )
        );
    }
}
