//! DNS name grammar helpers.
//!
//! Label syntax follows the classic letters/digits/hyphen rule; record owner
//! names additionally accept underscores for service labels such as
//! `_foo._tcp`. Hyphens may not start or end a label.

/// Sentinel for a zone's root record name.
pub const ROOT_NAME: &str = "@";

const CHARSET_ERROR: &str =
    "only letters, numbers, and - are allowed. DNS label may not start or end with -";
const CHARSET_ERROR_UNDERSCORE: &str =
    "only letters, numbers, _, and - are allowed. DNS label may not start or end with -";

/// The charset violation message for a name, with or without underscores.
pub fn charset_message(allow_underscore: bool) -> &'static str {
    if allow_underscore {
        CHARSET_ERROR_UNDERSCORE
    } else {
        CHARSET_ERROR
    }
}

/// The charset violation message for a domain-name valued record field.
pub fn domain_name_message(allow_underscore: bool) -> String {
    format!("invalid domain-name: {}", charset_message(allow_underscore))
}

fn label_ok(label: &str, allow_underscore: bool) -> bool {
    if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || (allow_underscore && c == '_'))
}

/// Validate a (possibly absolute) DNS name against the label grammar.
///
/// Returns the charset message on violation; the caller attaches the field.
pub fn validate_name(name: &str, allow_underscore: bool) -> Result<(), &'static str> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return Err(charset_message(allow_underscore));
    }
    for label in trimmed.split('.') {
        if !label_ok(label, allow_underscore) {
            return Err(charset_message(allow_underscore));
        }
    }
    Ok(())
}

/// True when the name is absolute (carries a trailing dot).
pub fn is_fqdn(name: &str) -> bool {
    name.ends_with('.')
}

/// Make a name absolute by appending a trailing dot when missing.
pub fn ensure_fqdn(name: &str) -> String {
    if is_fqdn(name) {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Qualify a possibly relative name against its owning zone.
///
/// Absolute names pass through; relative names get the zone appended.
pub fn qualify(name: &str, zone: &str) -> String {
    if is_fqdn(name) {
        name.to_string()
    } else {
        format!("{}.{}.", name, zone_key(zone))
    }
}

/// Canonical lookup key for a zone name: no trailing dot, lowercase.
pub fn zone_key(zone: &str) -> String {
    zone.trim_end_matches('.').to_lowercase()
}

/// True when the zone name denotes a reverse (address-to-name) zone.
pub fn is_reverse_zone(zone: &str) -> bool {
    let key = zone_key(zone);
    key.ends_with("in-addr.arpa") || key.ends_with("ip6.arpa")
}

/// True when an absolute name falls inside the given zone (or is the zone).
pub fn in_zone(fqdn: &str, zone: &str) -> bool {
    let name = zone_key(fqdn);
    let zone = zone_key(zone);
    name == zone || name.ends_with(&format!(".{}", zone))
}

/// The name of an in-zone FQDN relative to its zone; `@` for the apex.
pub fn relative_name(fqdn: &str, zone: &str) -> Option<String> {
    let name = zone_key(fqdn);
    let zone = zone_key(zone);
    if name == zone {
        return Some(ROOT_NAME.to_string());
    }
    name.strip_suffix(&format!(".{}", zone))
        .map(|rel| rel.to_string())
}
