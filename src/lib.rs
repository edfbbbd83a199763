//! Protocol stack for a handheld radiation instrument's fragmented wireless
//! link.
//!
//! The crate frames outbound commands into link-sized fragments, reassembles
//! inbound notification fragments into length-validated responses, walks the
//! instrument's self-describing record stream and integrates dose rate into
//! accumulated dose. [`Session`] ties these together behind three entry
//! points driven by the host: link events, notifications and ticks.
//! [`driver::SessionDriver`] runs a session on tokio.

pub mod clock;
pub mod command;
pub mod config;
pub mod dose;
pub mod driver;
pub mod framer;
pub mod hexdump;
pub mod link;
pub mod metrics;
pub mod prelude;
pub mod reassembly;
pub mod records;
pub mod response;
pub mod session;
pub mod telemetry;

#[cfg(test)]
extern crate self as radwire;
#[cfg(test)]
mod test_helpers;

pub use clock::Timestamp;
pub use command::{Command, Request, VirtualRegister};
pub use config::{ConfigError, SessionConfig};
pub use framer::{CommandFramer, FragmentBatch, SequenceNumber};
pub use link::{Link, LinkError, TransmitReport, WritePolicy};
pub use reassembly::{ReassemblyError, ReassemblyState, ResponseReassembler};
pub use response::{DecodeError, DecodedResponse, ResponseBody};
pub use session::{NotificationOutcome, ResponseError, Session, SessionState, TickOutcome};
pub use telemetry::{Metric, TelemetrySink};
