pub mod codec;
pub mod controller;
pub mod parts;
pub mod types;
pub mod validator;

pub use controller::{
    RecordAddOptions, RecordChange, RecordDelete, RecordModify, RecordSetController, ShowOptions,
};
pub use parts::{
    LatDir, LocParts, LocPatch, LonDir, MxParts, MxPatch, NsecParts, NsecPatch, PartsPatch,
    PtrPatch, RecordParts, SrvParts, SrvPatch,
};
pub use types::RecordType;
