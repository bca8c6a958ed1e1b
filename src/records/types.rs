use std::fmt;

/// Resource record types understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    A,
    AAAA,
    NS,
    CNAME,
    DNAME,
    MX,
    KX,
    SRV,
    LOC,
    NSEC,
    PTR,
    TXT,
}

/// Record type mnemonics accepted inside an NSEC type bitmap.
pub const NSEC_TYPES: &[&str] = &[
    "A", "AAAA", "A6", "AFSDB", "APL", "CERT", "CNAME", "DHCID", "DLV", "DNAME", "DNSKEY", "DS",
    "HINFO", "HIP", "IPSECKEY", "KEY", "KX", "LOC", "MX", "NAPTR", "NS", "NSEC", "NSEC3",
    "NSEC3PARAM", "PTR", "RRSIG", "RP", "SIG", "SOA", "SPF", "SRV", "SSHFP", "TXT",
];

impl RecordType {
    /// All record types, in directory attribute order.
    pub fn all() -> &'static [RecordType] {
        &[
            RecordType::A,
            RecordType::AAAA,
            RecordType::NS,
            RecordType::CNAME,
            RecordType::DNAME,
            RecordType::MX,
            RecordType::KX,
            RecordType::SRV,
            RecordType::LOC,
            RecordType::NSEC,
            RecordType::PTR,
            RecordType::TXT,
        ]
    }

    /// Directory attribute holding this type's raw values.
    pub fn attr(&self) -> &'static str {
        match self {
            RecordType::A => "arecord",
            RecordType::AAAA => "aaaarecord",
            RecordType::NS => "nsrecord",
            RecordType::CNAME => "cnamerecord",
            RecordType::DNAME => "dnamerecord",
            RecordType::MX => "mxrecord",
            RecordType::KX => "kxrecord",
            RecordType::SRV => "srvrecord",
            RecordType::LOC => "locrecord",
            RecordType::NSEC => "nsecrecord",
            RecordType::PTR => "ptrrecord",
            RecordType::TXT => "txtrecord",
        }
    }

    /// Record type owning a given directory attribute, if any.
    pub fn from_attr(attr: &str) -> Option<RecordType> {
        RecordType::all().iter().copied().find(|t| t.attr() == attr)
    }

    /// Record type for a mnemonic such as `TXT`.
    pub fn from_mnemonic(mnemonic: &str) -> Option<RecordType> {
        RecordType::all()
            .iter()
            .copied()
            .find(|t| t.to_string() == mnemonic)
    }

    /// Option name the raw value travels under, used in conflict messages.
    pub fn rec_option(&self) -> &'static str {
        match self {
            RecordType::A => "a_rec",
            RecordType::AAAA => "aaaa_rec",
            RecordType::NS => "ns_rec",
            RecordType::CNAME => "cname_rec",
            RecordType::DNAME => "dname_rec",
            RecordType::MX => "mx_rec",
            RecordType::KX => "kx_rec",
            RecordType::SRV => "srv_rec",
            RecordType::LOC => "loc_rec",
            RecordType::NSEC => "nsec_rec",
            RecordType::PTR => "ptr_rec",
            RecordType::TXT => "txt_rec",
        }
    }

    /// Prefix for structured part option names, e.g. `srv` in
    /// `srv_part_priority`.
    pub fn part_prefix(&self) -> &'static str {
        match self {
            RecordType::A => "a",
            RecordType::AAAA => "aaaa",
            RecordType::NS => "ns",
            RecordType::CNAME => "cname",
            RecordType::DNAME => "dname",
            RecordType::MX => "mx",
            RecordType::KX => "kx",
            RecordType::SRV => "srv",
            RecordType::LOC => "loc",
            RecordType::NSEC => "nsec",
            RecordType::PTR => "ptr",
            RecordType::TXT => "txt",
        }
    }

    /// Human-readable name used in value-not-found errors.
    pub fn display_name(&self) -> String {
        format!("{} record", self)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::DNAME => "DNAME",
            RecordType::MX => "MX",
            RecordType::KX => "KX",
            RecordType::SRV => "SRV",
            RecordType::LOC => "LOC",
            RecordType::NSEC => "NSEC",
            RecordType::PTR => "PTR",
            RecordType::TXT => "TXT",
        };
        f.write_str(mnemonic)
    }
}
