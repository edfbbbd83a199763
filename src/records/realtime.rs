//! Instantaneous radiation snapshot carried by `(0, 0)` records.

use bytes::Buf;

use super::RecordHeader;

/// Declared body length of a real-time record.
pub const REALTIME_BODY_SIZE: usize = 19;

const COUNT_RATE_OFFSET: usize = 4;
const NANOSIEVERT_PER_UNIT: f32 = 1e7;

/// Count rate and dose rate decoded from one real-time record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealTimeRecord {
    header: RecordHeader,
    count_rate: f32,
    dose_rate: f32,
}

impl RealTimeRecord {
    /// Build a record from raw instrument values.
    #[must_use]
    pub const fn new(header: RecordHeader, count_rate: f32, dose_rate: f32) -> Self {
        Self {
            header,
            count_rate,
            dose_rate,
        }
    }

    /// Decode a real-time body.
    ///
    /// Returns `None` when `body` is shorter than [`REALTIME_BODY_SIZE`].
    #[must_use]
    pub fn decode(header: RecordHeader, body: &[u8]) -> Option<Self> {
        if body.len() < REALTIME_BODY_SIZE {
            return None;
        }
        let mut fields = &body[COUNT_RATE_OFFSET..];
        let count_rate = fields.get_f32_le();
        let dose_rate = fields.get_f32_le();
        Some(Self::new(header, count_rate, dose_rate))
    }

    /// Header of the record this snapshot came from.
    #[must_use]
    pub const fn header(&self) -> RecordHeader { self.header }

    /// Counts per second.
    #[must_use]
    pub const fn count_rate(&self) -> f32 { self.count_rate }

    /// Dose rate in the instrument's native units per hour.
    #[must_use]
    pub const fn dose_rate(&self) -> f32 { self.dose_rate }

    /// Counts per minute, rounded to the nearest integer.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "count rates are small and non-negative; `as` saturates otherwise"
    )]
    #[must_use]
    pub fn count_rate_cpm(&self) -> u32 { (self.count_rate * 60.0).round() as u32 }

    /// Dose rate in nanosievert per hour.
    #[must_use]
    pub fn dose_rate_nsv_per_hour(&self) -> f32 { self.dose_rate * NANOSIEVERT_PER_UNIT }
}
