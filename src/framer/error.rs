//! Errors raised while framing outbound commands.

use thiserror::Error;

/// Errors produced while building an outbound packet.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// The payload cannot be described by the 32-bit length prefix.
    #[error("payload of {len} bytes does not fit the 32-bit length prefix")]
    PayloadTooLarge { len: usize },
}
