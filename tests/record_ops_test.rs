mod common;

use std::collections::BTreeMap;

use common::{REVZONE1, ZONE1, ZONE1_NS};
use zonewarden::records::{
    NsecPatch, PartsPatch, PtrPatch, RecordAddOptions, RecordChange, RecordDelete, RecordModify,
    RecordType, ShowOptions, SrvPatch,
};
use zonewarden::zone::attrs;
use zonewarden::{DeleteOutcome, DirectoryStore, DnsError};

const NAME1: &str = "testdnsres";
const AREC2: &str = "172.31.254.222";
const AREC3: &str = "172.16.250.123";

fn raw(rtype: RecordType, value: &str) -> RecordChange {
    RecordChange::new().with_raw(rtype, value)
}

#[test]
fn test_operations_on_missing_record() {
    let f = common::fixture();
    common::add_zone1(&f);
    let expected = DnsError::not_found("testdnsres: DNS resource record not found");

    assert_eq!(
        f.records
            .show(ZONE1, NAME1, ShowOptions::default())
            .unwrap_err(),
        expected
    );
    assert_eq!(
        f.records.delete(ZONE1, NAME1, RecordDelete::all()).unwrap_err(),
        expected
    );
    assert_eq!(
        f.records
            .modify(
                ZONE1,
                "ghostname",
                RecordModify {
                    change: raw(RecordType::AAAA, "f001:baad::1"),
                    ..Default::default()
                }
            )
            .unwrap_err(),
        DnsError::not_found("ghostname: DNS resource record not found")
    );
}

#[test]
fn test_root_record_cannot_be_deleted() {
    let f = common::fixture();
    common::add_zone1(&f);
    let err = f.records.delete(ZONE1, "@", RecordDelete::all()).unwrap_err();
    assert_eq!(
        err,
        DnsError::validation("del_all", "Zone record '@' cannot be deleted")
    );
}

#[test]
fn test_add_record_with_invalid_name() {
    let f = common::fixture();
    common::add_zone1(&f);
    let err = f
        .records
        .add(
            ZONE1,
            "invalid record",
            raw(RecordType::A, AREC2),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "name",
            "only letters, numbers, _, and - are allowed. DNS label may not start or end with -"
        )
    );
}

#[test]
fn test_add_and_extend_a_records() {
    let f = common::fixture();
    common::add_zone1(&f);

    let added = f
        .records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC2), RecordAddOptions::default())
        .unwrap();
    assert_eq!(added.value, NAME1);
    assert!(added.summary.is_none());
    assert_eq!(added.result[attrs::IDNS_NAME], vec![NAME1]);
    assert_eq!(added.result["arecord"], vec![AREC2]);

    let added = f
        .records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();
    assert_eq!(added.result["arecord"], vec![AREC2, AREC3]);

    // Removing one value leaves the other
    let deleted = f
        .records
        .delete(
            ZONE1,
            NAME1,
            RecordDelete::default().with_value(RecordType::A, AREC2),
        )
        .unwrap();
    match deleted.result {
        DeleteOutcome::Remaining(entry) => assert_eq!(entry["arecord"], vec![AREC3]),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_find_lists_all_names_in_zone() {
    let f = common::fixture();
    common::add_zone1(&f);
    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC2), RecordAddOptions::default())
        .unwrap();

    let found = f.records.find(ZONE1, &BTreeMap::new()).unwrap();
    assert_eq!(found.count, 4);
    let names: Vec<&str> = found
        .results
        .iter()
        .map(|entry| entry[attrs::IDNS_NAME][0].as_str())
        .collect();
    assert_eq!(names, vec!["@", "_kerberos", "ns1", NAME1]);

    // Filtered by record value substring
    let filters = BTreeMap::from([("arecord".to_string(), AREC2.to_string())]);
    let found = f.records.find(ZONE1, &filters).unwrap();
    assert_eq!(found.count, 1);
    assert_eq!(found.results[0][attrs::IDNS_NAME], vec![NAME1]);
}

#[test]
fn test_modify_replaces_and_removes_types() {
    let f = common::fixture();
    common::add_zone1(&f);
    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();

    // Adding a type via modify
    let modified = f
        .records
        .modify(
            ZONE1,
            NAME1,
            RecordModify {
                change: raw(RecordType::AAAA, "::1"),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(modified.result["arecord"], vec![AREC3]);
    assert_eq!(modified.result["aaaarecord"], vec!["::1"]);

    // Replacing it wholesale
    let modified = f
        .records
        .modify(
            ZONE1,
            NAME1,
            RecordModify {
                change: raw(RecordType::AAAA, "ff02::1"),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(modified.result["aaaarecord"], vec!["ff02::1"]);

    // Clearing removes the type entirely
    let modified = f
        .records
        .modify(
            ZONE1,
            NAME1,
            RecordModify {
                clear: vec![RecordType::AAAA],
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(modified.result["arecord"], vec![AREC3]);
    assert!(!modified.result.contains_key("aaaarecord"));
}

#[test]
fn test_mx_record_validation() {
    let f = common::fixture();
    common::add_zone1(&f);

    let err = f
        .records
        .add(ZONE1, "@", raw(RecordType::MX, ZONE1_NS), RecordAddOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "mx_rec",
            "format must be specified as \"PREFERENCE EXCHANGER\"  (see RFC 1035 for details)"
        )
    );

    let added = f
        .records
        .add(
            ZONE1,
            "@",
            raw(RecordType::MX, &format!("0 {}", ZONE1_NS)),
            RecordAddOptions::default(),
        )
        .unwrap();
    assert_eq!(added.value, "@");
    assert_eq!(added.result[attrs::IDNS_NAME], vec!["@"]);
    assert_eq!(added.result["mxrecord"], vec![format!("0 {}", ZONE1_NS)]);
    assert_eq!(added.result["nsrecord"], vec![ZONE1_NS]);
}

#[test]
fn test_srv_record_flows() {
    let f = common::fixture();
    common::add_zone1(&f);
    let srv_name = "_foo._tcp";
    let srv_value = format!("0 100 1234 {}", ZONE1_NS);

    // Raw value with the wrong shape
    let err = f
        .records
        .add(ZONE1, srv_name, raw(RecordType::SRV, ZONE1_NS), RecordAddOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "srv_rec",
            "format must be specified as \"PRIORITY WEIGHT PORT TARGET\"  \
             (see RFC 2782 for details)"
        )
    );

    // Parts with an invalid target
    let err = f
        .records
        .add(
            ZONE1,
            srv_name,
            RecordChange::new().with_parts(PartsPatch::SRV(SrvPatch {
                priority: Some(0),
                weight: Some(0),
                port: Some(123),
                target: Some("foo bar".to_string()),
            })),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "srv_target",
            "invalid domain-name: only letters, numbers, _, and - are allowed. \
             DNS label may not start or end with -"
        )
    );

    // Raw value and parts at once
    let err = f
        .records
        .add(
            ZONE1,
            srv_name,
            RecordChange::new()
                .with_raw(RecordType::SRV, format!("1 100 1234 {}", ZONE1_NS))
                .with_parts(PartsPatch::SRV(SrvPatch {
                    priority: Some(0),
                    weight: Some(0),
                    port: Some(123),
                    target: Some("foo.bar.".to_string()),
                })),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "srv_target",
            "Raw value of a DNS record was already set by \"srv_rec\" option"
        )
    );

    let added = f
        .records
        .add(ZONE1, srv_name, raw(RecordType::SRV, &srv_value), RecordAddOptions::default())
        .unwrap();
    assert_eq!(added.result["srvrecord"], vec![srv_value.clone()]);

    // Modify via parts without naming the value to change
    let err = f
        .records
        .modify(
            ZONE1,
            srv_name,
            RecordModify {
                change: RecordChange::new().with_parts(PartsPatch::SRV(SrvPatch {
                    priority: Some(1),
                    ..Default::default()
                })),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, DnsError::requirement("srvrecord"));

    // Modify against a value that is not in the record set
    let err = f
        .records
        .modify(
            ZONE1,
            srv_name,
            RecordModify {
                change: RecordChange::new()
                    .with_raw(RecordType::SRV, "0 100 1234 does.not.exist.")
                    .with_parts(PartsPatch::SRV(SrvPatch {
                        priority: Some(1),
                        ..Default::default()
                    })),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::attr_value_not_found("SRV record", "0 100 1234 does.not.exist.")
    );

    // Out-of-range part
    let err = f
        .records
        .modify(
            ZONE1,
            srv_name,
            RecordModify {
                change: RecordChange::new()
                    .with_raw(RecordType::SRV, srv_value.clone())
                    .with_parts(PartsPatch::SRV(SrvPatch {
                        priority: Some(100000),
                        ..Default::default()
                    })),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation("srv_priority", "can be at most 65535")
    );

    // And the working part modify
    let modified = f
        .records
        .modify(
            ZONE1,
            srv_name,
            RecordModify {
                change: RecordChange::new()
                    .with_raw(RecordType::SRV, srv_value)
                    .with_parts(PartsPatch::SRV(SrvPatch {
                        priority: Some(1),
                        ..Default::default()
                    })),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        modified.result["srvrecord"],
        vec![format!("1 100 1234 {}", ZONE1_NS)]
    );
}

#[test]
fn test_loc_record_validation() {
    let f = common::fixture();
    common::add_zone1(&f);

    let err = f
        .records
        .add(
            ZONE1,
            "@",
            raw(RecordType::LOC, "91 11 42.4 N 16 36 29.6 E 227.64"),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err, DnsError::validation("lat_deg", "can be at most 90"));

    let added = f
        .records
        .add(
            ZONE1,
            "@",
            raw(RecordType::LOC, "49 11 42.4 N 16 36 29.6 E 227.64"),
            RecordAddOptions::default(),
        )
        .unwrap();
    assert_eq!(
        added.result["locrecord"],
        vec!["49 11 42.400 N 16 36 29.600 E 227.64"]
    );
}

#[test]
fn test_cname_exclusivity() {
    let f = common::fixture();
    common::add_zone1(&f);
    let cname = "testcnamerec";
    let coexistence = DnsError::validation(
        "cnamerecord",
        "CNAME record is not allowed to coexist with any other record (RFC 1034, section 3.6.2)",
    );

    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();

    // CNAME cannot join a name that already has records
    let err = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::CNAME, "foo-1.example.com."),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err, coexistence);

    // Bad target label
    let err = f
        .records
        .add(
            ZONE1,
            cname,
            raw(RecordType::CNAME, "-.example.com"),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "hostname",
            "invalid domain-name: only letters, numbers, _, and - are allowed. \
             DNS label may not start or end with -"
        )
    );

    // At most one CNAME value per name
    let err = f
        .records
        .add(
            ZONE1,
            cname,
            RecordChange::new()
                .with_raw(RecordType::CNAME, "1.example.com.")
                .with_raw(RecordType::CNAME, "2.example.com."),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "cnamerecord",
            "only one CNAME record is allowed per name (RFC 2136, section 1.1.5)"
        )
    );

    let added = f
        .records
        .add(
            ZONE1,
            cname,
            raw(RecordType::CNAME, "foo-1.example.com."),
            RecordAddOptions::default(),
        )
        .unwrap();
    assert_eq!(added.result["cnamerecord"], vec!["foo-1.example.com."]);

    // Nothing else can join the CNAME, by add or modify
    let err = f
        .records
        .add(ZONE1, cname, raw(RecordType::A, "172.16.29.111"), RecordAddOptions::default())
        .unwrap_err();
    assert_eq!(err, coexistence);
    let err = f
        .records
        .modify(
            ZONE1,
            cname,
            RecordModify {
                change: raw(RecordType::A, "172.16.29.111"),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, coexistence);

    // Swapping the CNAME for an A record in one modify is fine
    let modified = f
        .records
        .modify(
            ZONE1,
            cname,
            RecordModify {
                change: raw(RecordType::A, "172.16.29.111"),
                clear: vec![RecordType::CNAME],
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(modified.result["arecord"], vec!["172.16.29.111"]);
    assert!(!modified.result.contains_key("cnamerecord"));
}

#[test]
fn test_dname_exclusivity() {
    let f = common::fixture();
    common::add_zone1(&f);
    let dname = "testdns-dname";

    let err = f
        .records
        .add(
            ZONE1,
            dname,
            RecordChange::new()
                .with_raw(RecordType::DNAME, "foo-1.example.com.")
                .with_raw(RecordType::DNAME, "foo-2.example.com."),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "dnamerecord",
            "only one DNAME record is allowed per name (RFC 6672, section 2.4)"
        )
    );

    let err = f
        .records
        .add(
            ZONE1,
            dname,
            raw(RecordType::DNAME, "-.example.com."),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, DnsError::Validation { field, .. } if field == "target"));

    // DNAME coexists with address records
    let added = f
        .records
        .add(
            ZONE1,
            dname,
            RecordChange::new()
                .with_raw(RecordType::DNAME, "d.example.com.")
                .with_raw(RecordType::A, "172.16.29.111"),
            RecordAddOptions::default(),
        )
        .unwrap();
    assert_eq!(added.result["dnamerecord"], vec!["d.example.com."]);
    assert_eq!(added.result["arecord"], vec!["172.16.29.111"]);

    // But not with CNAME
    let err = f
        .records
        .add(
            ZONE1,
            dname,
            raw(RecordType::CNAME, "foo-1.example.com."),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, DnsError::Validation { field, .. } if field == "cnamerecord"));

    // And not with NS outside the zone root
    let err = f
        .records
        .add(
            ZONE1,
            dname,
            raw(RecordType::NS, &format!("{}.{}.", NAME1, ZONE1)),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "dnamerecord",
            "DNAME record is not allowed to coexist with an NS record except when located \
             in a zone root record (RFC 6672, section 2.3)"
        )
    );
}

#[test]
fn test_dname_with_ns_allowed_at_root() {
    let f = common::fixture();
    common::add_zone1(&f);

    let added = f
        .records
        .add(
            ZONE1,
            "@",
            raw(RecordType::DNAME, "d.example.com."),
            RecordAddOptions::default(),
        )
        .unwrap();
    assert_eq!(added.result["dnamerecord"], vec!["d.example.com."]);
    assert_eq!(added.result["nsrecord"], vec![ZONE1_NS]);
}

#[test]
fn test_kx_txt_and_nsec_records() {
    let f = common::fixture();
    common::add_zone1(&f);
    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();

    let err = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::KX, "foo-1.example.com"),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "kx_rec",
            "format must be specified as \"PREFERENCE EXCHANGER\"  (see RFC 2230 for details)"
        )
    );

    let added = f
        .records
        .add(ZONE1, NAME1, raw(RecordType::KX, "1 foo-1"), RecordAddOptions::default())
        .unwrap();
    assert_eq!(added.result["kxrecord"], vec!["1 foo-1"]);

    let added = f
        .records
        .add(ZONE1, NAME1, raw(RecordType::TXT, "foo bar"), RecordAddOptions::default())
        .unwrap();
    assert_eq!(added.result["txtrecord"], vec!["foo bar"]);

    // NSEC assembled from parts
    let added = f
        .records
        .add(
            ZONE1,
            NAME1,
            RecordChange::new().with_parts(PartsPatch::NSEC(NsecPatch {
                next: Some(ZONE1.to_string()),
                types: Some(vec!["TXT".to_string(), "A".to_string()]),
            })),
            RecordAddOptions::default(),
        )
        .unwrap();
    assert_eq!(
        added.result["nsecrecord"],
        vec![format!("{} TXT A", ZONE1)]
    );
}

#[test]
fn test_ns_record_resolvability() {
    let f = common::fixture();
    common::add_zone1(&f);
    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();

    let err = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::NS, "does.not.exist."),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::not_found(
            "Nameserver 'does.not.exist.' does not have a corresponding A/AAAA record"
        )
    );

    // A relative name is qualified against the zone before the check
    let err = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::NS, "does.not.exist"),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::not_found(
            "Nameserver 'does.not.exist.dnszone.test.' does not have a \
             corresponding A/AAAA record"
        )
    );

    let added = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::NS, "does.not.exist."),
            RecordAddOptions {
                force: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(added.result["nsrecord"], vec!["does.not.exist."]);
}

#[test]
fn test_rename_record() {
    let f = common::fixture();
    common::add_zone1(&f);
    let renamed = "testdnsres-renamed";

    let err = f
        .records
        .modify(
            ZONE1,
            "@",
            RecordModify {
                rename: Some(renamed.to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation("rename", "DNS zone root record cannot be renamed")
    );

    f.records
        .add(
            ZONE1,
            NAME1,
            RecordChange::new()
                .with_raw(RecordType::A, AREC3)
                .with_raw(RecordType::TXT, "foo bar"),
            RecordAddOptions::default(),
        )
        .unwrap();

    let modified = f
        .records
        .modify(
            ZONE1,
            NAME1,
            RecordModify {
                rename: Some(renamed.to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(modified.value, NAME1);
    assert_eq!(modified.result[attrs::IDNS_NAME], vec![renamed]);
    assert_eq!(modified.result["arecord"], vec![AREC3]);
    assert_eq!(modified.result["txtrecord"], vec!["foo bar"]);

    // The values moved intact; the old name is gone
    assert!(f.store.get_record(ZONE1, NAME1).is_none());
    let moved = f.store.get_record(ZONE1, renamed).unwrap();
    assert_eq!(moved["arecord"], vec![AREC3]);
}

#[test]
fn test_delete_all_removes_name() {
    let f = common::fixture();
    common::add_zone1(&f);
    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();

    let deleted = f.records.delete(ZONE1, NAME1, RecordDelete::all()).unwrap();
    assert_eq!(deleted.value, NAME1);
    assert_eq!(
        deleted.summary.as_deref(),
        Some("Deleted record \"testdnsres\"")
    );
    assert!(matches!(deleted.result, DeleteOutcome::Removed(status) if status.failed.is_empty()));

    assert_eq!(
        f.records
            .show(ZONE1, NAME1, ShowOptions::default())
            .unwrap_err(),
        DnsError::not_found("testdnsres: DNS resource record not found")
    );
}

#[test]
fn test_deleting_last_value_removes_name() {
    let f = common::fixture();
    common::add_zone1(&f);
    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();

    let deleted = f
        .records
        .delete(
            ZONE1,
            NAME1,
            RecordDelete::default().with_value(RecordType::A, AREC3),
        )
        .unwrap();
    assert!(matches!(deleted.result, DeleteOutcome::Removed(_)));
    assert!(f.store.get_record(ZONE1, NAME1).is_none());

    // The missing value is reported when it is not in the set
    f.records
        .add(ZONE1, NAME1, raw(RecordType::A, AREC3), RecordAddOptions::default())
        .unwrap();
    let err = f
        .records
        .delete(
            ZONE1,
            NAME1,
            RecordDelete::default().with_value(RecordType::A, AREC2),
        )
        .unwrap_err();
    assert_eq!(err, DnsError::attr_value_not_found("A record", AREC2));
}

#[test]
fn test_ptr_records_and_reverse_synthesis() {
    let f = common::fixture();
    common::add_zone1(&f);
    common::add_revzone1(&f);

    // PTR hostnames are plain hostnames: no underscore labels
    let err = f
        .records
        .add(
            REVZONE1,
            "80",
            raw(RecordType::PTR, "-.example.com"),
            RecordAddOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::validation(
            "hostname",
            "invalid domain-name: only letters, numbers, and - are allowed. \
             DNS label may not start or end with -"
        )
    );

    let added = f
        .records
        .add(
            REVZONE1,
            "80",
            raw(RecordType::PTR, "foo-1.example.com"),
            RecordAddOptions::default(),
        )
        .unwrap();
    assert_eq!(added.result["ptrrecord"], vec!["foo-1.example.com."]);

    // Reverse synthesis refuses to overwrite the existing PTR
    let err = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::A, "172.16.31.80"),
            RecordAddOptions {
                create_reverse: true,
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::duplicate(
            "Reverse record for IP address 172.16.31.80 already exists in reverse zone \
             31.16.172.in-addr.arpa.."
        )
    );

    // A fresh address gets its PTR created alongside
    let added = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::A, "172.16.31.81"),
            RecordAddOptions {
                create_reverse: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(added.result["arecord"], vec!["172.16.31.81"]);
    let ptr = f
        .records
        .show(REVZONE1, "81", ShowOptions::default())
        .unwrap();
    assert_eq!(
        ptr.result.entry["ptrrecord"],
        vec![format!("{}.{}.", NAME1, ZONE1)]
    );

    // No reverse zone for the address at all
    let err = f
        .records
        .add(
            ZONE1,
            NAME1,
            raw(RecordType::A, "10.1.2.3"),
            RecordAddOptions {
                create_reverse: true,
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        DnsError::not_found("DNS reverse zone for IP address 10.1.2.3 not found")
    );
}

#[test]
fn test_structured_show() {
    let f = common::fixture();
    common::add_zone1(&f);
    common::add_revzone1(&f);
    f.records
        .add(
            REVZONE1,
            "80",
            RecordChange::new().with_parts(PartsPatch::PTR(PtrPatch {
                hostname: Some("foo-1.example.com".to_string()),
            })),
            RecordAddOptions::default(),
        )
        .unwrap();

    let shown = f
        .records
        .show(
            REVZONE1,
            "80",
            ShowOptions {
                structured: true,
                all: true,
            },
        )
        .unwrap();
    let records = shown.result.dnsrecords.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].dnstype, "PTR");
    assert_eq!(records[0].dnsdata, "foo-1.example.com.");
    assert_eq!(
        records[0].parts["ptr_part_hostname"],
        "foo-1.example.com."
    );
}

#[test]
fn test_add_with_empty_change() {
    let f = common::fixture();
    common::add_zone1(&f);
    let err = f
        .records
        .add(ZONE1, NAME1, RecordChange::new(), RecordAddOptions::default())
        .unwrap_err();
    assert_eq!(err, DnsError::EmptyModlist);
}
