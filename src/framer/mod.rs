//! Outbound command framing and transport-sized fragmentation.
//!
//! A command travels as one length-prefixed packet. The packet is then cut
//! into fixed-size fragments with no per-fragment framing: the receiver only
//! counts bytes against the declared length.

pub mod error;
pub mod fragmenter;
pub mod packet;
pub mod sequence;

pub use error::FramingError;
pub use fragmenter::{CommandFramer, DEFAULT_FRAGMENT_SIZE, FragmentBatch};
pub use packet::{LENGTH_PREFIX_SIZE, OutPacket, PACKET_HEADER_SIZE};
pub use sequence::SequenceNumber;
