//! Errors explaining why an inbound response was dropped.

use thiserror::Error;

use crate::{reassembly::ReassemblyError, response::DecodeError};

/// Reason an inbound fragment or response was discarded.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// The fragment could not start or extend a response.
    #[error(transparent)]
    Reassembly(#[from] ReassemblyError),
    /// The complete response failed validation.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A register value arrived with no register read outstanding.
    #[error("register value received without a pending register read")]
    UnsolicitedRegister,
}
