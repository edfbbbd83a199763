//! Walking the self-describing record stream of a data-buffer read.
//!
//! A data-buffer payload is a run of records, each a 7-byte header followed
//! by a body whose length is fixed by the record's `(entity_id, group_id)`
//! pair. Known kinds are listed in a small lookup table; anything else ends
//! the walk while keeping what was already decoded.

pub mod header;
pub mod kind;
pub mod parser;
pub mod realtime;

pub use header::{RECORD_HEADER_SIZE, RecordHeader};
pub use kind::RecordKind;
pub use parser::{ParsedRecords, StopReason, parse};
pub use realtime::{REALTIME_BODY_SIZE, RealTimeRecord};
