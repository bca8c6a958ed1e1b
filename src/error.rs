use thiserror::Error;

/// Errors surfaced by zone and record operations.
///
/// Every variant is terminal: a failed operation leaves the store untouched
/// and the caller sees the field and message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// Missing zone, record, or permission.
    #[error("{reason}")]
    NotFound { reason: String },

    /// Name collision on create.
    #[error("{message}")]
    DuplicateEntry { message: String },

    /// Syntax or semantic rule violation, addressable to a single field.
    #[error("invalid '{field}': {message}")]
    Validation { field: String, message: String },

    /// A required companion field was not supplied.
    #[error("'{field}' is required")]
    Requirement { field: String },

    /// A referenced value is absent from the current record set.
    #[error("{attr} does not contain '{value}'")]
    AttrValueNotFound { attr: String, value: String },

    /// The operation carried no changes.
    #[error("no modifications to be performed")]
    EmptyModlist,
}

impl DnsError {
    pub fn not_found(reason: impl Into<String>) -> Self {
        DnsError::NotFound {
            reason: reason.into(),
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        DnsError::DuplicateEntry {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DnsError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn requirement(field: impl Into<String>) -> Self {
        DnsError::Requirement {
            field: field.into(),
        }
    }

    pub fn attr_value_not_found(attr: impl Into<String>, value: impl Into<String>) -> Self {
        DnsError::AttrValueNotFound {
            attr: attr.into(),
            value: value.into(),
        }
    }
}

/// Errors from loading the engine configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DnsError>;
