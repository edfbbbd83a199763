//! Convenience imports for hosts embedding a session.
//!
//! Only the types a host touches when wiring a link and a sink are listed.
//! Protocol internals stay in their owning modules.
//!
//! # Examples
//!
//! ```rust
//! use radwire::prelude::*;
//!
//! let sink = |metric: Metric, value: f32| println!("{metric}={value}");
//! # struct Radio;
//! # impl Link for Radio {
//! #     fn write(&mut self, _: &[u8]) -> Result<(), LinkError> { Ok(()) }
//! #     fn is_services_discovered(&self) -> bool { true }
//! # }
//! let mut session = Session::new(SessionConfig::default(), Radio, sink)
//!     .expect("default config is valid");
//! session.on_services_discovered();
//! session.on_subscribed(Timestamp::ZERO);
//! assert_eq!(session.state(), SessionState::Operational);
//! ```

pub use crate::{
    clock::Timestamp,
    config::SessionConfig,
    driver::{LinkEvent, SessionDriver},
    link::{Link, LinkError, WritePolicy},
    session::{NotificationOutcome, Session, SessionState},
    telemetry::{Metric, TelemetrySink},
};
