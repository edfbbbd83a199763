//! Inbound reassembly of fragmented responses.
//!
//! Responses arrive as link notifications with no per-fragment framing. The
//! first fragment of a response declares the total size in a little-endian
//! `u32` prefix; later fragments are appended verbatim until the declared
//! size is reached. Only one response is ever in flight.

pub mod buffer;
pub mod error;
pub mod reassembler;

pub use buffer::{ReassembledResponse, ResponseBuffer};
pub use error::ReassemblyError;
pub use reassembler::{
    DEFAULT_MAX_RESPONSE_SIZE,
    DEFAULT_RESPONSE_TIMEOUT,
    ReassemblyState,
    ResponseReassembler,
    StalledResponse,
};

#[cfg(test)]
mod tests;
