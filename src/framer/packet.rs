//! Encoding of a single framed command.

use bytes::{BufMut, Bytes, BytesMut};

use super::{FramingError, SequenceNumber};

/// Size of the little-endian `u32` length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;
/// Bytes counted by the length prefix ahead of the payload: command code,
/// reserved byte and sequence number.
pub const PACKET_HEADER_SIZE: usize = 4;

/// One framed command ready for transmission.
///
/// The wire layout is
/// `total_length:u32 | command_code:u16 | reserved:u8 | sequence:u8 | payload`,
/// little-endian throughout. `total_length` covers everything after itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutPacket {
    command_code: u16,
    sequence: SequenceNumber,
    payload: Bytes,
}

impl OutPacket {
    /// Construct a packet.
    #[must_use]
    pub fn new(command_code: u16, sequence: SequenceNumber, payload: impl Into<Bytes>) -> Self {
        Self {
            command_code,
            sequence,
            payload: payload.into(),
        }
    }

    /// Return the command code.
    #[must_use]
    pub const fn command_code(&self) -> u16 { self.command_code }

    /// Return the sequence number.
    #[must_use]
    pub const fn sequence(&self) -> SequenceNumber { self.sequence }

    /// Borrow the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Value written into the length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::PayloadTooLarge`] when the payload plus header
    /// cannot be expressed as a `u32`.
    pub fn total_length(&self) -> Result<u32, FramingError> {
        let len = self.payload.len();
        len.checked_add(PACKET_HEADER_SIZE)
            .and_then(|total| u32::try_from(total).ok())
            .ok_or(FramingError::PayloadTooLarge { len })
    }

    /// Encode the packet, length prefix included.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::PayloadTooLarge`] when the length prefix would
    /// overflow.
    pub fn encode(&self) -> Result<Bytes, FramingError> {
        let total_length = self.total_length()?;
        let mut buf =
            BytesMut::with_capacity(LENGTH_PREFIX_SIZE + PACKET_HEADER_SIZE + self.payload.len());
        buf.put_u32_le(total_length);
        buf.put_u16_le(self.command_code);
        buf.put_u8(0);
        buf.put_u8(self.sequence.get());
        buf.put_slice(&self.payload);
        Ok(buf.freeze())
    }
}
