use std::net::{Ipv4Addr, Ipv6Addr};

use super::types::{NSEC_TYPES, RecordType};
use crate::error::{DnsError, Result};
use crate::name;

/// Check a numeric part against a 16-bit field width.
fn check_u16(value: u32, field: &str) -> Result<u16> {
    u16::try_from(value).map_err(|_| DnsError::validation(field, "can be at most 65535"))
}

fn check_max_u32(value: u32, max: u32, field: &str) -> Result<u32> {
    if value > max {
        return Err(DnsError::validation(
            field,
            format!("can be at most {}", max),
        ));
    }
    Ok(value)
}

fn check_range_f64(value: f64, min: f64, max: f64, field: &str) -> Result<f64> {
    if value > max {
        return Err(DnsError::validation(
            field,
            format!("can be at most {}", max),
        ));
    }
    if value < min {
        return Err(DnsError::validation(
            field,
            format!("must be at least {}", min),
        ));
    }
    Ok(value)
}

fn check_domain_name(value: &str, allow_underscore: bool, field: &str) -> Result<()> {
    name::validate_name(value, allow_underscore)
        .map_err(|_| DnsError::validation(field, name::domain_name_message(allow_underscore)))
}

/// MX and KX preference/exchanger pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxParts {
    pub preference: u16,
    pub exchanger: String,
}

impl MxParts {
    /// Build a validated pair; `rtype` picks the error field prefix.
    pub fn new(rtype: RecordType, preference: u32, exchanger: String) -> Result<MxParts> {
        let prefix = rtype.part_prefix();
        let preference = check_u16(preference, &format!("{}_preference", prefix))?;
        check_domain_name(&exchanger, true, &format!("{}_exchanger", prefix))?;
        Ok(MxParts {
            preference,
            exchanger,
        })
    }
}

/// SRV priority/weight/port/target, RFC 2782.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvParts {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

impl SrvParts {
    pub fn new(priority: u32, weight: u32, port: u32, target: String) -> Result<SrvParts> {
        let priority = check_u16(priority, "srv_priority")?;
        let weight = check_u16(weight, "srv_weight")?;
        let port = check_u16(port, "srv_port")?;
        check_domain_name(&target, true, "srv_target")?;
        Ok(SrvParts {
            priority,
            weight,
            port,
            target,
        })
    }
}

/// Compass direction of a latitude coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatDir {
    North,
    South,
}

impl LatDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            LatDir::North => "N",
            LatDir::South => "S",
        }
    }

    pub fn parse(token: &str) -> Option<LatDir> {
        match token {
            "N" => Some(LatDir::North),
            "S" => Some(LatDir::South),
            _ => None,
        }
    }
}

/// Compass direction of a longitude coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonDir {
    East,
    West,
}

impl LonDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            LonDir::East => "E",
            LonDir::West => "W",
        }
    }

    pub fn parse(token: &str) -> Option<LonDir> {
        match token {
            "E" => Some(LonDir::East),
            "W" => Some(LonDir::West),
            _ => None,
        }
    }
}

/// LOC geographic position, RFC 1876 master-file form.
#[derive(Debug, Clone, PartialEq)]
pub struct LocParts {
    pub lat_deg: u32,
    pub lat_min: u32,
    pub lat_sec: f64,
    pub lat_dir: LatDir,
    pub lon_deg: u32,
    pub lon_min: u32,
    pub lon_sec: f64,
    pub lon_dir: LonDir,
    pub altitude: f64,
    pub size: Option<f64>,
    pub h_precision: Option<f64>,
    pub v_precision: Option<f64>,
}

impl LocParts {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lat_deg: u32,
        lat_min: u32,
        lat_sec: f64,
        lat_dir: LatDir,
        lon_deg: u32,
        lon_min: u32,
        lon_sec: f64,
        lon_dir: LonDir,
        altitude: f64,
        size: Option<f64>,
        h_precision: Option<f64>,
        v_precision: Option<f64>,
    ) -> Result<LocParts> {
        check_max_u32(lat_deg, 90, "lat_deg")?;
        check_max_u32(lat_min, 59, "lat_min")?;
        check_range_f64(lat_sec, 0.0, 59.999, "lat_sec")?;
        check_max_u32(lon_deg, 180, "lon_deg")?;
        check_max_u32(lon_min, 59, "lon_min")?;
        check_range_f64(lon_sec, 0.0, 59.999, "lon_sec")?;
        check_range_f64(altitude, -100000.00, 42849672.95, "altitude")?;
        if let Some(size) = size {
            check_range_f64(size, 0.0, 90000000.00, "size")?;
        }
        if let Some(hp) = h_precision {
            check_range_f64(hp, 0.0, 90000000.00, "h_precision")?;
        }
        if let Some(vp) = v_precision {
            check_range_f64(vp, 0.0, 90000000.00, "v_precision")?;
        }
        Ok(LocParts {
            lat_deg,
            lat_min,
            lat_sec,
            lat_dir,
            lon_deg,
            lon_min,
            lon_sec,
            lon_dir,
            altitude,
            size,
            h_precision,
            v_precision,
        })
    }
}

/// NSEC next-owner plus type bitmap, RFC 4034 text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsecParts {
    pub next: String,
    pub types: Vec<String>,
}

impl NsecParts {
    pub fn new(next: String, types: Vec<String>) -> Result<NsecParts> {
        check_domain_name(&next, true, "nsec_next")?;
        if types.is_empty() {
            return Err(DnsError::requirement("nsec_part_types"));
        }
        for t in &types {
            if !NSEC_TYPES.contains(&t.as_str()) {
                return Err(DnsError::validation(
                    "nsec_types",
                    format!("unsupported record type \"{}\"", t),
                ));
            }
        }
        Ok(NsecParts { next, types })
    }
}

/// Typed decomposition of one record value.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordParts {
    A { address: Ipv4Addr },
    AAAA { address: Ipv6Addr },
    NS { hostname: String },
    CNAME { hostname: String },
    DNAME { target: String },
    PTR { hostname: String },
    TXT { data: String },
    MX(MxParts),
    KX(MxParts),
    SRV(SrvParts),
    LOC(LocParts),
    NSEC(NsecParts),
}

impl RecordParts {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordParts::A { .. } => RecordType::A,
            RecordParts::AAAA { .. } => RecordType::AAAA,
            RecordParts::NS { .. } => RecordType::NS,
            RecordParts::CNAME { .. } => RecordType::CNAME,
            RecordParts::DNAME { .. } => RecordType::DNAME,
            RecordParts::PTR { .. } => RecordType::PTR,
            RecordParts::TXT { .. } => RecordType::TXT,
            RecordParts::MX(_) => RecordType::MX,
            RecordParts::KX(_) => RecordType::KX,
            RecordParts::SRV(_) => RecordType::SRV,
            RecordParts::LOC(_) => RecordType::LOC,
            RecordParts::NSEC(_) => RecordType::NSEC,
        }
    }

    /// Part option names and values for the structured record view,
    /// e.g. `ptr_part_hostname` -> `foo-1.example.com.`.
    pub fn part_fields(&self) -> Vec<(String, String)> {
        let prefix = self.record_type().part_prefix();
        let key = |field: &str| format!("{}_part_{}", prefix, field);
        match self {
            RecordParts::A { address } => vec![(key("ip_address"), address.to_string())],
            RecordParts::AAAA { address } => vec![(key("ip_address"), address.to_string())],
            RecordParts::NS { hostname }
            | RecordParts::CNAME { hostname }
            | RecordParts::PTR { hostname } => vec![(key("hostname"), hostname.clone())],
            RecordParts::DNAME { target } => vec![(key("target"), target.clone())],
            RecordParts::TXT { data } => vec![(key("data"), data.clone())],
            RecordParts::MX(mx) | RecordParts::KX(mx) => vec![
                (key("preference"), mx.preference.to_string()),
                (key("exchanger"), mx.exchanger.clone()),
            ],
            RecordParts::SRV(srv) => vec![
                (key("priority"), srv.priority.to_string()),
                (key("weight"), srv.weight.to_string()),
                (key("port"), srv.port.to_string()),
                (key("target"), srv.target.clone()),
            ],
            RecordParts::LOC(loc) => {
                let mut fields = vec![
                    (key("lat_deg"), loc.lat_deg.to_string()),
                    (key("lat_min"), loc.lat_min.to_string()),
                    (key("lat_sec"), format!("{:.3}", loc.lat_sec)),
                    (key("lat_dir"), loc.lat_dir.as_str().to_string()),
                    (key("lon_deg"), loc.lon_deg.to_string()),
                    (key("lon_min"), loc.lon_min.to_string()),
                    (key("lon_sec"), format!("{:.3}", loc.lon_sec)),
                    (key("lon_dir"), loc.lon_dir.as_str().to_string()),
                    (key("altitude"), super::codec::format_decimal(loc.altitude)),
                ];
                if let Some(size) = loc.size {
                    fields.push((key("size"), super::codec::format_decimal(size)));
                }
                if let Some(hp) = loc.h_precision {
                    fields.push((key("h_precision"), super::codec::format_decimal(hp)));
                }
                if let Some(vp) = loc.v_precision {
                    fields.push((key("v_precision"), super::codec::format_decimal(vp)));
                }
                fields
            }
            RecordParts::NSEC(nsec) => vec![
                (key("next"), nsec.next.clone()),
                (key("types"), nsec.types.join(" ")),
            ],
        }
    }
}

/// Partial part-field input for one record type.
///
/// In an add, the patch must be complete. In a modify, it is overlaid on the
/// decoded form of an existing raw value.
#[derive(Debug, Clone, Default)]
pub struct MxPatch {
    pub preference: Option<u32>,
    pub exchanger: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SrvPatch {
    pub priority: Option<u32>,
    pub weight: Option<u32>,
    pub port: Option<u32>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LocPatch {
    pub lat_deg: Option<u32>,
    pub lat_min: Option<u32>,
    pub lat_sec: Option<f64>,
    pub lat_dir: Option<LatDir>,
    pub lon_deg: Option<u32>,
    pub lon_min: Option<u32>,
    pub lon_sec: Option<f64>,
    pub lon_dir: Option<LonDir>,
    pub altitude: Option<f64>,
    pub size: Option<f64>,
    pub h_precision: Option<f64>,
    pub v_precision: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct NsecPatch {
    pub next: Option<String>,
    pub types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PtrPatch {
    pub hostname: Option<String>,
}

/// Part-field input routed to the right record type.
#[derive(Debug, Clone)]
pub enum PartsPatch {
    MX(MxPatch),
    KX(MxPatch),
    SRV(SrvPatch),
    LOC(LocPatch),
    NSEC(NsecPatch),
    PTR(PtrPatch),
}

impl PartsPatch {
    pub fn record_type(&self) -> RecordType {
        match self {
            PartsPatch::MX(_) => RecordType::MX,
            PartsPatch::KX(_) => RecordType::KX,
            PartsPatch::SRV(_) => RecordType::SRV,
            PartsPatch::LOC(_) => RecordType::LOC,
            PartsPatch::NSEC(_) => RecordType::NSEC,
            PartsPatch::PTR(_) => RecordType::PTR,
        }
    }

    /// The error field for a raw-value conflict: the last part field the
    /// caller supplied, named without the `_part` infix.
    pub fn conflict_field(&self) -> String {
        let prefix = self.record_type().part_prefix();
        let field = |name: &str| format!("{}_{}", prefix, name);
        match self {
            PartsPatch::MX(p) | PartsPatch::KX(p) => {
                if p.exchanger.is_some() {
                    field("exchanger")
                } else {
                    field("preference")
                }
            }
            PartsPatch::SRV(p) => {
                if p.target.is_some() {
                    field("target")
                } else if p.port.is_some() {
                    field("port")
                } else if p.weight.is_some() {
                    field("weight")
                } else {
                    field("priority")
                }
            }
            PartsPatch::LOC(p) => {
                if p.altitude.is_some() {
                    "altitude".to_string()
                } else if p.lon_dir.is_some() {
                    "lon_dir".to_string()
                } else {
                    "lat_deg".to_string()
                }
            }
            PartsPatch::NSEC(p) => {
                if p.types.is_some() {
                    field("types")
                } else {
                    field("next")
                }
            }
            PartsPatch::PTR(_) => field("hostname"),
        }
    }

    /// Build full parts for an add; every required field must be present.
    pub fn complete(&self) -> Result<RecordParts> {
        let prefix = self.record_type().part_prefix();
        let missing = |name: &str| DnsError::requirement(format!("{}_part_{}", prefix, name));
        match self {
            PartsPatch::MX(p) | PartsPatch::KX(p) => {
                let preference = p.preference.ok_or_else(|| missing("preference"))?;
                let exchanger = p.exchanger.clone().ok_or_else(|| missing("exchanger"))?;
                let parts = MxParts::new(self.record_type(), preference, exchanger)?;
                Ok(match self {
                    PartsPatch::KX(_) => RecordParts::KX(parts),
                    _ => RecordParts::MX(parts),
                })
            }
            PartsPatch::SRV(p) => {
                let priority = p.priority.ok_or_else(|| missing("priority"))?;
                let weight = p.weight.ok_or_else(|| missing("weight"))?;
                let port = p.port.ok_or_else(|| missing("port"))?;
                let target = p.target.clone().ok_or_else(|| missing("target"))?;
                Ok(RecordParts::SRV(SrvParts::new(
                    priority, weight, port, target,
                )?))
            }
            PartsPatch::LOC(p) => {
                let lat_deg = p.lat_deg.ok_or_else(|| missing("lat_deg"))?;
                let lat_dir = p.lat_dir.ok_or_else(|| missing("lat_dir"))?;
                let lon_deg = p.lon_deg.ok_or_else(|| missing("lon_deg"))?;
                let lon_dir = p.lon_dir.ok_or_else(|| missing("lon_dir"))?;
                let altitude = p.altitude.ok_or_else(|| missing("altitude"))?;
                Ok(RecordParts::LOC(LocParts::new(
                    lat_deg,
                    p.lat_min.unwrap_or(0),
                    p.lat_sec.unwrap_or(0.0),
                    lat_dir,
                    lon_deg,
                    p.lon_min.unwrap_or(0),
                    p.lon_sec.unwrap_or(0.0),
                    lon_dir,
                    altitude,
                    p.size,
                    p.h_precision,
                    p.v_precision,
                )?))
            }
            PartsPatch::NSEC(p) => {
                let next = p.next.clone().ok_or_else(|| missing("next"))?;
                let types = p.types.clone().ok_or_else(|| missing("types"))?;
                Ok(RecordParts::NSEC(NsecParts::new(next, types)?))
            }
            PartsPatch::PTR(p) => {
                let hostname = p.hostname.clone().ok_or_else(|| missing("hostname"))?;
                super::codec::decode(RecordType::PTR, &hostname)
            }
        }
    }

    /// Overlay the supplied fields on decoded parts, revalidating.
    pub fn apply(&self, current: RecordParts) -> Result<RecordParts> {
        match (self, current) {
            (PartsPatch::MX(p), RecordParts::MX(mx)) => Ok(RecordParts::MX(MxParts::new(
                RecordType::MX,
                p.preference.unwrap_or(u32::from(mx.preference)),
                p.exchanger.clone().unwrap_or(mx.exchanger),
            )?)),
            (PartsPatch::KX(p), RecordParts::KX(kx)) => Ok(RecordParts::KX(MxParts::new(
                RecordType::KX,
                p.preference.unwrap_or(u32::from(kx.preference)),
                p.exchanger.clone().unwrap_or(kx.exchanger),
            )?)),
            (PartsPatch::SRV(p), RecordParts::SRV(srv)) => {
                Ok(RecordParts::SRV(SrvParts::new(
                    p.priority.unwrap_or(u32::from(srv.priority)),
                    p.weight.unwrap_or(u32::from(srv.weight)),
                    p.port.unwrap_or(u32::from(srv.port)),
                    p.target.clone().unwrap_or(srv.target),
                )?))
            }
            (PartsPatch::LOC(p), RecordParts::LOC(loc)) => Ok(RecordParts::LOC(LocParts::new(
                p.lat_deg.unwrap_or(loc.lat_deg),
                p.lat_min.unwrap_or(loc.lat_min),
                p.lat_sec.unwrap_or(loc.lat_sec),
                p.lat_dir.unwrap_or(loc.lat_dir),
                p.lon_deg.unwrap_or(loc.lon_deg),
                p.lon_min.unwrap_or(loc.lon_min),
                p.lon_sec.unwrap_or(loc.lon_sec),
                p.lon_dir.unwrap_or(loc.lon_dir),
                p.altitude.unwrap_or(loc.altitude),
                p.size.or(loc.size),
                p.h_precision.or(loc.h_precision),
                p.v_precision.or(loc.v_precision),
            )?)),
            (PartsPatch::NSEC(p), RecordParts::NSEC(nsec)) => Ok(RecordParts::NSEC(
                NsecParts::new(
                    p.next.clone().unwrap_or(nsec.next),
                    p.types.clone().unwrap_or(nsec.types),
                )?,
            )),
            (PartsPatch::PTR(p), RecordParts::PTR { hostname }) => {
                let hostname = p.hostname.clone().unwrap_or(hostname);
                super::codec::decode(RecordType::PTR, &hostname)
            }
            (patch, current) => Err(DnsError::validation(
                current.record_type().attr(),
                format!(
                    "{} part fields cannot modify a {} value",
                    patch.record_type(),
                    current.record_type()
                ),
            )),
        }
    }
}
