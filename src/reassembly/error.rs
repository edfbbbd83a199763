//! Rejection reasons emitted by the response reassembler.

use std::num::NonZeroUsize;

use thiserror::Error;

/// Reasons a fragment was refused by the reassembler.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// The first fragment of a response cannot hold the size prefix.
    #[error("first fragment too short: {len} bytes, need at least 4")]
    FirstFragmentTooShort { len: usize },
    /// The declared response size exceeds the configured cap.
    #[error("declared response size {declared} exceeds limit {limit}")]
    ResponseTooLarge { declared: u32, limit: NonZeroUsize },
}
