//! The fixed header that opens every record.

use bytes::Buf;

use super::RecordKind;

/// Size of a record header in bytes.
pub const RECORD_HEADER_SIZE: usize = 7;

/// Header preceding each record body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    /// Rolling record counter assigned by the device.
    pub record_seq: u8,
    /// Entity half of the record type tag.
    pub entity_id: u8,
    /// Group half of the record type tag.
    pub group_id: u8,
    /// Offset of the record from the buffer's base time, in device ticks.
    pub timestamp_offset: u32,
}

impl RecordHeader {
    /// Read a header from the front of `bytes`.
    ///
    /// Returns `None` when fewer than [`RECORD_HEADER_SIZE`] bytes remain; no
    /// partial header is ever read.
    #[must_use]
    pub fn read(bytes: &[u8]) -> Option<Self> {
        let mut buf = bytes.get(..RECORD_HEADER_SIZE)?;
        Some(Self {
            record_seq: buf.get_u8(),
            entity_id: buf.get_u8(),
            group_id: buf.get_u8(),
            timestamp_offset: buf.get_u32_le(),
        })
    }

    /// Classify the record by its type tag.
    #[must_use]
    pub const fn kind(&self) -> RecordKind { RecordKind::classify(self.entity_id, self.group_id) }
}
