//! Reverse zone name derivation.
//!
//! A reverse zone name is the address prefix of an IP network, reversed,
//! under `in-addr.arpa.` or `ip6.arpa.`. Without an explicit prefix length
//! the network is taken to end at the last non-zero octet (or nibble), so
//! `172.16.31.0` and `172.16.31.0/24` both derive `31.16.172.in-addr.arpa.`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{DnsError, Result};
use crate::name;

fn invalid_network() -> DnsError {
    DnsError::validation("name_from_ip", "invalid IP network format")
}

/// Derive a reverse zone name from an IP address or CIDR network.
pub fn zone_name_from_ip(input: &str) -> Result<String> {
    let (addr, prefix) = match input.split_once('/') {
        Some((addr, prefix)) => {
            let prefix: u8 = prefix.parse().map_err(|_| invalid_network())?;
            (addr, Some(prefix))
        }
        None => (input, None),
    };

    if addr.contains(':') {
        let addr: Ipv6Addr = addr.parse().map_err(|_| invalid_network())?;
        zone_name_v6(addr, prefix)
    } else {
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid_network())?;
        zone_name_v4(addr, prefix)
    }
}

fn zone_name_v4(addr: Ipv4Addr, prefix: Option<u8>) -> Result<String> {
    let octets = addr.octets();
    let count = match prefix {
        Some(prefix) if prefix > 32 => return Err(invalid_network()),
        Some(prefix) => usize::from(prefix).div_ceil(8),
        // No prefix: drop trailing zero octets, keep at least one
        None => octets
            .iter()
            .rposition(|o| *o != 0)
            .map_or(1, |last| last + 1),
    };
    let labels: Vec<String> = octets[..count.max(1)]
        .iter()
        .rev()
        .map(u8::to_string)
        .collect();
    Ok(format!("{}.in-addr.arpa.", labels.join(".")))
}

fn zone_name_v6(addr: Ipv6Addr, prefix: Option<u8>) -> Result<String> {
    let nibbles = nibbles_of(addr);
    let count = match prefix {
        Some(prefix) if prefix > 128 => return Err(invalid_network()),
        Some(prefix) => usize::from(prefix).div_ceil(4),
        None => nibbles
            .iter()
            .rposition(|n| *n != 0)
            .map_or(1, |last| last + 1),
    };
    let labels: Vec<String> = nibbles[..count.max(1)]
        .iter()
        .rev()
        .map(|n| format!("{:x}", n))
        .collect();
    Ok(format!("{}.ip6.arpa.", labels.join(".")))
}

fn nibbles_of(addr: Ipv6Addr) -> Vec<u8> {
    addr.octets()
        .iter()
        .flat_map(|octet| [octet >> 4, octet & 0x0f])
        .collect()
}

/// The full reverse name of an address, without the trailing dot.
pub fn full_reverse_name(addr: IpAddr) -> String {
    match addr {
        IpAddr::V4(addr) => {
            let labels: Vec<String> = addr.octets().iter().rev().map(u8::to_string).collect();
            format!("{}.in-addr.arpa", labels.join("."))
        }
        IpAddr::V6(addr) => {
            let labels: Vec<String> = nibbles_of(addr)
                .iter()
                .rev()
                .map(|n| format!("{:x}", n))
                .collect();
            format!("{}.ip6.arpa", labels.join("."))
        }
    }
}

/// The record name of an address inside a reverse zone, when it fits.
pub fn record_name_in_zone(addr: IpAddr, zone: &str) -> Option<String> {
    let full = full_reverse_name(addr);
    let zone_key = name::zone_key(zone);
    full.strip_suffix(&format!(".{}", zone_key))
        .map(str::to_string)
}
