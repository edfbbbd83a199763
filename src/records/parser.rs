//! Left-to-right walk over a data-buffer payload.

use log::{debug, trace, warn};

use super::{RECORD_HEADER_SIZE, RealTimeRecord, RecordHeader, RecordKind};

/// Why the walk over a payload ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Every byte was consumed by whole records.
    Exhausted,
    /// Fewer than [`RECORD_HEADER_SIZE`] bytes remained.
    TruncatedHeader {
        /// Bytes left over after the last whole record.
        remaining: usize,
    },
    /// A record declared more body bytes than the payload holds.
    TruncatedBody {
        /// Kind of the cut-off record.
        kind: RecordKind,
        /// Offset of the record's header.
        offset: usize,
    },
    /// An extended section began; it is never decoded.
    Extended {
        /// Offset of the extended record's header.
        offset: usize,
    },
    /// A record with an unrecognised type tag was found.
    Unknown {
        /// Entity half of the tag.
        entity_id: u8,
        /// Group half of the tag.
        group_id: u8,
        /// Offset of the record's header.
        offset: usize,
    },
}

/// Records decoded from one payload, plus how the walk ended.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedRecords {
    records: Vec<RealTimeRecord>,
    skipped: usize,
    stop: StopReason,
}

impl ParsedRecords {
    /// Decoded real-time records, in payload order.
    #[must_use]
    pub fn records(&self) -> &[RealTimeRecord] { &self.records }

    /// Number of recognised records walked over without decoding.
    #[must_use]
    pub const fn skipped(&self) -> usize { self.skipped }

    /// Why the walk ended.
    #[must_use]
    pub const fn stop(&self) -> StopReason { self.stop }

    /// Consume the result, returning the decoded records.
    #[must_use]
    pub fn into_records(self) -> Vec<RealTimeRecord> { self.records }
}

/// Walk `payload`, decoding every real-time record before the first stop
/// condition.
///
/// Never fails: an unknown tag or truncated tail ends the walk and whatever
/// was decoded up to that point is returned.
#[must_use]
pub fn parse(payload: &[u8]) -> ParsedRecords {
    let mut records = Vec::new();
    let mut skipped = 0;
    let mut offset = 0;

    let stop = loop {
        let rest = &payload[offset..];
        if rest.is_empty() {
            break StopReason::Exhausted;
        }
        let Some(header) = RecordHeader::read(rest) else {
            break StopReason::TruncatedHeader {
                remaining: rest.len(),
            };
        };
        let kind = header.kind();
        let Some(body_len) = kind.body_len() else {
            break stop_at(header, kind, offset);
        };
        let Some(body) = rest[RECORD_HEADER_SIZE..].get(..body_len) else {
            break StopReason::TruncatedBody { kind, offset };
        };

        match kind.decoder().and_then(|decode| decode(header, body)) {
            Some(record) => records.push(record),
            None => {
                trace!(
                    "skipped record: kind={kind}, record_seq={}, offset={offset}",
                    header.record_seq
                );
                skipped += 1;
            }
        }
        offset += RECORD_HEADER_SIZE + body_len;
    };

    if let StopReason::TruncatedBody { kind, offset } = stop {
        debug!("record body cut short: kind={kind}, offset={offset}, payload_len={}", payload.len());
    }
    ParsedRecords {
        records,
        skipped,
        stop,
    }
}

fn stop_at(header: RecordHeader, kind: RecordKind, offset: usize) -> StopReason {
    if kind == RecordKind::Extended {
        debug!(
            "extended records reached: group_id={}, offset={offset}",
            header.group_id
        );
        return StopReason::Extended { offset };
    }
    warn!(
        "unknown record: entity_id={}, group_id={}, offset={offset}",
        header.entity_id, header.group_id
    );
    StopReason::Unknown {
        entity_id: header.entity_id,
        group_id: header.group_id,
        offset,
    }
}
