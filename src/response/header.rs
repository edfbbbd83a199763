//! Header shared by every inbound response.

use bytes::Buf;

use super::DecodeError;

/// Size of a response header in bytes.
pub const RESPONSE_HEADER_SIZE: usize = 8;

/// Command echo and status preceding every response payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseHeader {
    command_code: u16,
    reserved: u8,
    sequence: u8,
    retcode: u32,
}

impl ResponseHeader {
    /// Split `bytes` into a header and the payload that follows it.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TooShort`] if fewer than
    /// [`RESPONSE_HEADER_SIZE`] bytes are available.
    pub fn split(bytes: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        if bytes.len() < RESPONSE_HEADER_SIZE {
            return Err(DecodeError::TooShort { len: bytes.len() });
        }
        let mut buf = bytes;
        let header = Self {
            command_code: buf.get_u16_le(),
            reserved: buf.get_u8(),
            sequence: buf.get_u8(),
            retcode: buf.get_u32_le(),
        };
        Ok((header, buf))
    }

    /// Echoed command code.
    #[must_use]
    pub const fn command_code(&self) -> u16 { self.command_code }

    /// Reserved byte; zero in practice.
    #[must_use]
    pub const fn reserved(&self) -> u8 { self.reserved }

    /// Echoed sequence byte.
    #[must_use]
    pub const fn sequence(&self) -> u8 { self.sequence }

    /// Status code reported by the instrument.
    #[must_use]
    pub const fn retcode(&self) -> u32 { self.retcode }
}
