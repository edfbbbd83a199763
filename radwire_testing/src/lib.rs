//! Test doubles and wire builders for exercising a
//! [`Session`](radwire::Session) without a radio.
//!
//! ```rust
//! use radwire::{Session, SessionConfig, Timestamp};
//! use radwire_testing::{RecordingLink, RecordingSink};
//!
//! let link = RecordingLink::ready();
//! let mut session = Session::new(SessionConfig::default(), link.clone(), RecordingSink::default())
//!     .expect("default config is valid");
//! session.on_services_discovered();
//! session.on_subscribed(Timestamp::ZERO);
//! assert_eq!(link.writes().len(), 1);
//! ```

pub mod link;
pub mod logging;
pub mod sink;
pub mod wire;

pub use link::RecordingLink;
pub use logging::{LoggerHandle, logger};
pub use sink::RecordingSink;
pub use wire::{realtime_record, record, response_body, response_wire, with_size_prefix};
