//! Text codec between raw RFC master-file record values and typed parts.
//!
//! Both directions are pure. Decoding canonicalizes where the grammar allows
//! slack (absolute PTR/CNAME/DNAME targets, LOC seconds precision), so
//! `encode(decode(raw))` yields the stored form of `raw`.

use super::parts::{LatDir, LocParts, LonDir, MxParts, NsecParts, RecordParts, SrvParts};
use super::types::RecordType;
use crate::error::{DnsError, Result};
use crate::name;

const MX_FORMAT: &str =
    "format must be specified as \"PREFERENCE EXCHANGER\"  (see RFC 1035 for details)";
const KX_FORMAT: &str =
    "format must be specified as \"PREFERENCE EXCHANGER\"  (see RFC 2230 for details)";
const SRV_FORMAT: &str =
    "format must be specified as \"PRIORITY WEIGHT PORT TARGET\"  (see RFC 2782 for details)";
const NSEC_FORMAT: &str =
    "format must be specified as \"NEXT TYPE1 [TYPE2 [TYPE3 [...]]]\" (see RFC 4034 for details)";
const LOC_FORMAT: &str = "format must be specified as \"d1 [m1 [s1]] {\"N\"|\"S\"} d2 [m2 [s2]] \
     {\"E\"|\"W\"} alt[\"m\"] [siz[\"m\"] [hp[\"m\"] [vp[\"m\"]]]]\"  (see RFC 1876 for details)";

/// Render a decimal without trailing zero noise, two places max.
pub(crate) fn format_decimal(value: f64) -> String {
    let s = format!("{:.2}", value);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn check_domain_name(value: &str, allow_underscore: bool, field: &str) -> Result<()> {
    name::validate_name(value, allow_underscore)
        .map_err(|_| DnsError::validation(field, name::domain_name_message(allow_underscore)))
}

/// Decode one raw record value into its typed parts.
pub fn decode(rtype: RecordType, raw: &str) -> Result<RecordParts> {
    let raw = raw.trim();
    match rtype {
        RecordType::A => {
            let address = raw
                .parse()
                .map_err(|_| DnsError::validation("a_rec", "invalid IP address format"))?;
            Ok(RecordParts::A { address })
        }
        RecordType::AAAA => {
            let address = raw
                .parse()
                .map_err(|_| DnsError::validation("aaaa_rec", "invalid IP address format"))?;
            Ok(RecordParts::AAAA { address })
        }
        RecordType::NS => {
            check_domain_name(raw, false, "hostname")?;
            Ok(RecordParts::NS {
                hostname: raw.to_string(),
            })
        }
        RecordType::CNAME => {
            check_domain_name(raw, true, "hostname")?;
            Ok(RecordParts::CNAME {
                hostname: name::ensure_fqdn(raw),
            })
        }
        RecordType::DNAME => {
            check_domain_name(raw, true, "target")?;
            Ok(RecordParts::DNAME {
                target: name::ensure_fqdn(raw),
            })
        }
        RecordType::PTR => {
            check_domain_name(raw, false, "hostname")?;
            Ok(RecordParts::PTR {
                hostname: name::ensure_fqdn(raw),
            })
        }
        RecordType::TXT => Ok(RecordParts::TXT {
            data: raw.to_string(),
        }),
        RecordType::MX | RecordType::KX => decode_mx(rtype, raw),
        RecordType::SRV => decode_srv(raw),
        RecordType::NSEC => decode_nsec(raw),
        RecordType::LOC => decode_loc(raw),
    }
}

/// Encode typed parts back into the canonical raw value.
pub fn encode(parts: &RecordParts) -> String {
    match parts {
        RecordParts::A { address } => address.to_string(),
        RecordParts::AAAA { address } => address.to_string(),
        RecordParts::NS { hostname }
        | RecordParts::CNAME { hostname }
        | RecordParts::PTR { hostname } => hostname.clone(),
        RecordParts::DNAME { target } => target.clone(),
        RecordParts::TXT { data } => data.clone(),
        RecordParts::MX(mx) | RecordParts::KX(mx) => {
            format!("{} {}", mx.preference, mx.exchanger)
        }
        RecordParts::SRV(srv) => format!(
            "{} {} {} {}",
            srv.priority, srv.weight, srv.port, srv.target
        ),
        RecordParts::NSEC(nsec) => format!("{} {}", nsec.next, nsec.types.join(" ")),
        RecordParts::LOC(loc) => encode_loc(loc),
    }
}

/// Decode and re-encode, yielding the canonical stored form.
pub fn canonicalize(rtype: RecordType, raw: &str) -> Result<String> {
    Ok(encode(&decode(rtype, raw)?))
}

fn decode_mx(rtype: RecordType, raw: &str) -> Result<RecordParts> {
    let format_msg = match rtype {
        RecordType::KX => KX_FORMAT,
        _ => MX_FORMAT,
    };
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let [preference, exchanger] = tokens.as_slice() else {
        return Err(DnsError::validation(rtype.rec_option(), format_msg));
    };
    let preference: u32 = preference
        .parse()
        .map_err(|_| DnsError::validation(rtype.rec_option(), format_msg))?;
    let parts = MxParts::new(rtype, preference, exchanger.to_string())?;
    Ok(match rtype {
        RecordType::KX => RecordParts::KX(parts),
        _ => RecordParts::MX(parts),
    })
}

fn decode_srv(raw: &str) -> Result<RecordParts> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let [priority, weight, port, target] = tokens.as_slice() else {
        return Err(DnsError::validation("srv_rec", SRV_FORMAT));
    };
    let numeric = |tok: &str| -> Result<u32> {
        tok.parse()
            .map_err(|_| DnsError::validation("srv_rec", SRV_FORMAT))
    };
    Ok(RecordParts::SRV(SrvParts::new(
        numeric(priority)?,
        numeric(weight)?,
        numeric(port)?,
        target.to_string(),
    )?))
}

fn decode_nsec(raw: &str) -> Result<RecordParts> {
    let mut tokens = raw.split_whitespace();
    let Some(next) = tokens.next() else {
        return Err(DnsError::validation("nsec_rec", NSEC_FORMAT));
    };
    let types: Vec<String> = tokens.map(str::to_string).collect();
    if types.is_empty() {
        return Err(DnsError::validation("nsec_rec", NSEC_FORMAT));
    }
    Ok(RecordParts::NSEC(NsecParts::new(next.to_string(), types)?))
}

fn decode_loc(raw: &str) -> Result<RecordParts> {
    let format_err = || DnsError::validation("loc_rec", LOC_FORMAT);
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut i = 0;

    let (lat_deg, lat_min, lat_sec, lat_dir) =
        take_coordinate(&tokens, &mut i, |t| LatDir::parse(t).map(Coord::Lat))?;
    let (lon_deg, lon_min, lon_sec, lon_dir) =
        take_coordinate(&tokens, &mut i, |t| LonDir::parse(t).map(Coord::Lon))?;
    let (Coord::Lat(lat_dir), Coord::Lon(lon_dir)) = (lat_dir, lon_dir) else {
        return Err(format_err());
    };

    let altitude = tokens
        .get(i)
        .and_then(|t| parse_meters(t))
        .ok_or_else(format_err)?;
    i += 1;

    let mut optionals = [None, None, None];
    for slot in optionals.iter_mut() {
        let Some(token) = tokens.get(i) else { break };
        *slot = Some(parse_meters(token).ok_or_else(format_err)?);
        i += 1;
    }
    if i != tokens.len() {
        return Err(format_err());
    }
    let [size, h_precision, v_precision] = optionals;

    Ok(RecordParts::LOC(LocParts::new(
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
    )?))
}

/// Either compass axis, so one coordinate parser serves both.
enum Coord {
    Lat(LatDir),
    Lon(LonDir),
}

/// Consume `degrees [minutes [seconds]] direction` from the token stream.
fn take_coordinate(
    tokens: &[&str],
    i: &mut usize,
    parse_dir: impl Fn(&str) -> Option<Coord>,
) -> Result<(u32, u32, f64, Coord)> {
    let format_err = || DnsError::validation("loc_rec", LOC_FORMAT);

    let degrees: u32 = tokens
        .get(*i)
        .and_then(|t| t.parse().ok())
        .ok_or_else(format_err)?;
    *i += 1;

    let mut minutes = 0u32;
    let mut seconds = 0.0f64;
    for step in 0..3 {
        let token = tokens.get(*i).ok_or_else(format_err)?;
        if let Some(dir) = parse_dir(token) {
            *i += 1;
            return Ok((degrees, minutes, seconds, dir));
        }
        match step {
            0 => minutes = token.parse().map_err(|_| format_err())?,
            1 => seconds = token.parse().map_err(|_| format_err())?,
            _ => return Err(format_err()),
        }
        *i += 1;
    }
    Err(format_err())
}

/// Parse a distance that may carry the RFC 1876 `m` suffix.
fn parse_meters(token: &str) -> Option<f64> {
    let token = token.strip_suffix('m').unwrap_or(token);
    token.parse().ok()
}

fn encode_loc(loc: &LocParts) -> String {
    let mut out = format!(
        "{} {} {:.3} {} {} {} {:.3} {} {}",
        loc.lat_deg,
        loc.lat_min,
        loc.lat_sec,
        loc.lat_dir.as_str(),
        loc.lon_deg,
        loc.lon_min,
        loc.lon_sec,
        loc.lon_dir.as_str(),
        format_decimal(loc.altitude),
    );
    // Trailing optional fields only render up to the last one present
    let optionals = [loc.size, loc.h_precision, loc.v_precision];
    let last = optionals.iter().rposition(Option::is_some);
    if let Some(last) = last {
        for value in optionals.into_iter().take(last + 1) {
            out.push(' ');
            out.push_str(&format_decimal(value.unwrap_or(0.0)));
        }
    }
    out
}
