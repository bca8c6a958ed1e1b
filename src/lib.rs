pub mod api;
pub mod config;
pub mod error;
pub mod name;
pub mod permission;
pub mod records;
pub mod resolver;
pub mod store;
pub mod zone;

pub use api::{DeleteOutcome, DeleteStatus, FindResult, OpResult, RecordView, StructuredRecord};
pub use config::{EngineConfig, GlobalConfig};
pub use error::{DnsError, Result};
pub use records::{RecordSetController, RecordType};
pub use store::{DirectoryStore, Entry, MemoryDirectory};
pub use zone::{ZoneAdd, ZoneLifecycle};
