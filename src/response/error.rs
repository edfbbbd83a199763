//! Error types for response decoding.

use thiserror::Error;

use crate::command::Command;

/// Reasons a complete response is discarded.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The response cannot hold a full header.
    #[error("response too short: {len} bytes, need at least 8")]
    TooShort {
        /// Bytes available.
        len: usize,
    },
    /// The echoed command is not one this decoder handles.
    #[error("unexpected command echo {code:#06x}")]
    UnexpectedCommand {
        /// Echoed command code.
        code: u16,
    },
    /// The instrument reported failure for the command.
    #[error("{command} failed: retcode={retcode}")]
    Rejected {
        /// Command the response answers.
        command: Command,
        /// Return code reported by the instrument.
        retcode: u32,
    },
    /// A register read returned fewer than four payload bytes.
    #[error("register value truncated: {len} bytes, need 4")]
    TruncatedRegister {
        /// Payload bytes available.
        len: usize,
    },
}
