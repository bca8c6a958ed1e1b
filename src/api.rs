//! Operation result envelopes.
//!
//! Every operation returns `{value, summary, result}` on success; the result
//! payload varies by operation and is typed per call site.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::Entry;

/// Success envelope common to all operations.
#[derive(Debug, Clone, PartialEq)]
pub struct OpResult<T> {
    /// Primary key of the affected object (zone, record, or permission name).
    pub value: String,
    /// Human-readable outcome, when the operation has one.
    pub summary: Option<String>,
    pub result: T,
}

/// Deletion result; `failed` lists what could not be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteStatus {
    pub failed: String,
}

impl DeleteStatus {
    pub fn clean() -> Self {
        DeleteStatus {
            failed: String::new(),
        }
    }
}

/// Search result page.
#[derive(Debug, Clone, PartialEq)]
pub struct FindResult {
    pub summary: Option<String>,
    pub count: usize,
    pub truncated: bool,
    pub results: Vec<Entry>,
}

impl FindResult {
    pub fn new(results: Vec<Entry>) -> Self {
        FindResult {
            summary: None,
            count: results.len(),
            truncated: false,
            results,
        }
    }
}

/// One record value decomposed for the structured show view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredRecord {
    pub dnstype: String,
    pub dnsdata: String,
    #[serde(flatten)]
    pub parts: BTreeMap<String, String>,
}

/// A record entry, optionally with its structured decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub entry: Entry,
    pub dnsrecords: Option<Vec<StructuredRecord>>,
}

/// Outcome of a record delete: values left behind, or the name removed.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Remaining(Entry),
    Removed(DeleteStatus),
}
