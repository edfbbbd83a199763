//! Validation and dispatch of complete inbound responses.
//!
//! A reassembled response starts with an eight-byte header echoing the
//! command. The return code is checked against the command's own success
//! convention before the payload is handed to the record walker or read as a
//! register value.

pub mod decoder;
pub mod error;
pub mod header;

pub use decoder::{DecodedResponse, ResponseBody, decode};
pub use error::DecodeError;
pub use header::{RESPONSE_HEADER_SIZE, ResponseHeader};
