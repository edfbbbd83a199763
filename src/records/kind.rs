//! Lookup table of known record kinds.

use std::fmt;

use super::{REALTIME_BODY_SIZE, RealTimeRecord, RecordHeader};

/// Decoder applied to a record body of the declared length.
pub type BodyDecoder = fn(RecordHeader, &[u8]) -> Option<RealTimeRecord>;

/// Known record kinds, tagged by `(entity_id, group_id)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Instantaneous count and dose rate, tag `(0, 0)`.
    RealTime,
    /// Raw counter snapshot, tag `(0, 1)`.
    RawData,
    /// Dose-rate database entry, tag `(0, 2)`.
    DoseRateDb,
    /// Device event, tag `(0, 7)`.
    Event,
    /// Extended or spectrum section, entity `1`. Never decoded.
    Extended,
    /// Any other tag.
    Unknown,
}

/// Fixed layout of one walkable record kind.
struct Layout {
    entity_id: u8,
    group_id: u8,
    kind: RecordKind,
    body_len: usize,
    decoder: Option<BodyDecoder>,
}

const LAYOUTS: [Layout; 4] = [
    Layout {
        entity_id: 0,
        group_id: 0,
        kind: RecordKind::RealTime,
        body_len: REALTIME_BODY_SIZE,
        decoder: Some(RealTimeRecord::decode),
    },
    Layout {
        entity_id: 0,
        group_id: 1,
        kind: RecordKind::RawData,
        body_len: 8,
        decoder: None,
    },
    Layout {
        entity_id: 0,
        group_id: 2,
        kind: RecordKind::DoseRateDb,
        body_len: 16,
        decoder: None,
    },
    Layout {
        entity_id: 0,
        group_id: 7,
        kind: RecordKind::Event,
        body_len: 4,
        decoder: None,
    },
];

const EXTENDED_ENTITY: u8 = 1;

impl RecordKind {
    /// Classify a record by its type tag.
    #[must_use]
    pub const fn classify(entity_id: u8, group_id: u8) -> Self {
        let mut i = 0;
        while i < LAYOUTS.len() {
            let layout = &LAYOUTS[i];
            if layout.entity_id == entity_id && layout.group_id == group_id {
                return layout.kind;
            }
            i += 1;
        }
        if entity_id == EXTENDED_ENTITY {
            Self::Extended
        } else {
            Self::Unknown
        }
    }

    fn layout(self) -> Option<&'static Layout> {
        static TABLE: [Layout; 4] = LAYOUTS;
        TABLE.iter().find(|layout| layout.kind == self)
    }

    /// Body length for walkable kinds; `None` means the walk must stop.
    #[must_use]
    pub fn body_len(self) -> Option<usize> { self.layout().map(|layout| layout.body_len) }

    /// Decoder for kinds that carry telemetry.
    #[must_use]
    pub fn decoder(self) -> Option<BodyDecoder> { self.layout().and_then(|layout| layout.decoder) }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RealTime => "real-time",
            Self::RawData => "raw-data",
            Self::DoseRateDb => "dose-rate-db",
            Self::Event => "event",
            Self::Extended => "extended",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
