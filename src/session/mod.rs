//! Session coordination for one instrument.
//!
//! [`Session`] owns every piece of per-connection state: the sequence
//! counter, the handshake state, the request schedule, the response
//! reassembler and the dose integrator. Hosts drive it from three entry
//! points: link events, inbound notifications and periodic ticks. Each entry
//! point takes the current [`Timestamp`](crate::clock::Timestamp) and runs to
//! completion, so one owner needs no locking.

pub mod error;
pub mod schedule;
pub mod sequencer;
pub mod state;

pub use error::ResponseError;
pub use schedule::RequestSchedule;
pub use sequencer::{NotificationOutcome, Session, TickOutcome};
pub use state::SessionState;

#[cfg(test)]
mod tests;
