//! Allow-query / allow-transfer ACL canonicalization.
//!
//! ACL strings are semicolon-separated address-match lists. Canonical form
//! pads abbreviated IPv4 networks to four octets and terminates the list
//! with a semicolon, e.g. `!192.0.2/24;any;` becomes `!192.0.2.0/24;any;`.

use std::net::Ipv6Addr;

use crate::error::{DnsError, Result};

const KEYWORDS: &[&str] = &["any", "none", "localhost", "localnets"];

/// Canonicalize one ACL string; `field` names the option in errors.
pub fn canonicalize(field: &str, input: &str) -> Result<String> {
    let mut out = String::new();
    for token in input.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (negated, body) = match token.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, token),
        };
        let canonical = canonicalize_token(field, body)?;
        if negated {
            out.push('!');
        }
        out.push_str(&canonical);
        out.push(';');
    }
    Ok(out)
}

fn invalid(field: &str, token: &str) -> DnsError {
    DnsError::validation(
        field,
        format!("failed to detect a valid IP address from '{}'", token),
    )
}

fn canonicalize_token(field: &str, token: &str) -> Result<String> {
    if KEYWORDS.contains(&token) {
        return Ok(token.to_string());
    }
    if token.contains(':') {
        return canonicalize_v6(field, token);
    }
    canonicalize_v4(field, token)
}

fn canonicalize_v6(field: &str, token: &str) -> Result<String> {
    let (addr, prefix) = split_prefix(token);
    let addr: Ipv6Addr = addr.parse().map_err(|_| invalid(field, token))?;
    match prefix {
        None => Ok(addr.to_string()),
        Some(prefix) => {
            let prefix: u8 = prefix.parse().map_err(|_| invalid(field, token))?;
            if prefix > 128 {
                return Err(invalid(field, token));
            }
            Ok(format!("{}/{}", addr, prefix))
        }
    }
}

/// IPv4 match-list elements may abbreviate the address, `192.0.2/24`.
fn canonicalize_v4(field: &str, token: &str) -> Result<String> {
    let (addr, prefix) = split_prefix(token);

    let octets: Vec<&str> = addr.split('.').collect();
    if octets.is_empty() || octets.len() > 4 {
        return Err(invalid(field, token));
    }
    let mut parsed = Vec::with_capacity(4);
    for octet in &octets {
        let value: u8 = octet.parse().map_err(|_| invalid(field, token))?;
        parsed.push(value.to_string());
    }
    while parsed.len() < 4 {
        parsed.push("0".to_string());
    }
    let addr = parsed.join(".");

    match prefix {
        None => Ok(addr),
        Some(prefix) => {
            let prefix: u8 = prefix.parse().map_err(|_| invalid(field, token))?;
            if prefix > 32 {
                return Err(invalid(field, token));
            }
            Ok(format!("{}/{}", addr, prefix))
        }
    }
}

fn split_prefix(token: &str) -> (&str, Option<&str>) {
    match token.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (token, None),
    }
}
