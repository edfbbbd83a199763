//! Rolling command sequence numbers.

use derive_more::Display;

/// Sequence byte stamped into every outbound packet.
///
/// The device expects the high bit set and cycles through 32 values, so the
/// byte always lies in `0x80..=0x9F`.
///
/// # Examples
///
/// ```
/// use radwire::framer::SequenceNumber;
///
/// assert_eq!(SequenceNumber::from_counter(0).get(), 0x80);
/// assert_eq!(SequenceNumber::from_counter(31).get(), 0x9F);
/// assert_eq!(SequenceNumber::from_counter(32), SequenceNumber::from_counter(0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[display("{_0:#04x}")]
pub struct SequenceNumber(u8);

impl SequenceNumber {
    /// Bit that marks a byte as a host-issued sequence number.
    pub const FLAG: u8 = 0x80;
    /// Number of distinct sequence values before wraparound.
    pub const CYCLE: u8 = 32;

    /// Derive the sequence byte for a session counter value.
    #[must_use]
    pub const fn from_counter(counter: u8) -> Self { Self(Self::FLAG | (counter % Self::CYCLE)) }

    /// Return the raw sequence byte.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }
}

impl From<SequenceNumber> for u8 {
    fn from(value: SequenceNumber) -> Self { value.0 }
}
