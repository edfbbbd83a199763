//! Session configuration.
//!
//! [`SessionConfig`] gathers every tunable of a session. The defaults match
//! the instrument's documented behaviour; hosts may deserialise overrides
//! with any `serde` format. [`Session::new`](crate::Session::new) refuses a
//! configuration that fails [`SessionConfig::validate`].

use std::{fmt, num::NonZeroUsize, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dose::DEFAULT_REPORT_INTERVAL,
    framer::DEFAULT_FRAGMENT_SIZE,
    link::WritePolicy,
    reassembly::{DEFAULT_MAX_RESPONSE_SIZE, DEFAULT_RESPONSE_TIMEOUT},
    response::RESPONSE_HEADER_SIZE,
};

/// Default spacing between data-buffer reads.
pub const DEFAULT_DATA_INTERVAL: Duration = Duration::from_secs(5);
/// Default spacing between temperature reads.
pub const DEFAULT_TEMPERATURE_INTERVAL: Duration = Duration::from_secs(30);

/// Errors raised by [`SessionConfig::validate`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration that paces the session is zero.
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The response cap cannot hold even a response header.
    #[error("max_response_size must be at least 8 bytes, got {size}")]
    ResponseCapTooSmall {
        /// Configured cap.
        size: usize,
    },
}

/// Tunables for one instrument session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Largest fragment the link accepts.
    pub fragment_size: NonZeroUsize,
    /// Time a partially received response may take to complete.
    pub response_timeout: Duration,
    /// Largest response size a first fragment may declare.
    pub max_response_size: NonZeroUsize,
    /// Spacing between data-buffer reads.
    pub data_interval: Duration,
    /// Spacing between temperature reads.
    pub temperature_interval: Duration,
    /// Minimum spacing between accumulated-dose reports.
    pub dose_report_interval: Duration,
    /// Handling of fragment write failures.
    pub write_policy: WritePolicy,
}

impl SessionConfig {
    /// Check that the configuration can drive a session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("response_timeout", self.response_timeout),
            ("data_interval", self.data_interval),
            ("temperature_interval", self.temperature_interval),
            ("dose_report_interval", self.dose_report_interval),
        ];
        if let Some((field, _)) = durations.into_iter().find(|(_, d)| d.is_zero()) {
            return Err(ConfigError::ZeroDuration { field });
        }
        if self.max_response_size.get() < RESPONSE_HEADER_SIZE {
            return Err(ConfigError::ResponseCapTooSmall {
                size: self.max_response_size.get(),
            });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fragment_size: DEFAULT_FRAGMENT_SIZE,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            data_interval: DEFAULT_DATA_INTERVAL,
            temperature_interval: DEFAULT_TEMPERATURE_INTERVAL,
            dose_report_interval: DEFAULT_REPORT_INTERVAL,
            write_policy: WritePolicy::default(),
        }
    }
}

impl fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "session config:")?;
        writeln!(f, "  fragment size: {} bytes", self.fragment_size)?;
        writeln!(f, "  response timeout: {:?}", self.response_timeout)?;
        writeln!(f, "  max response size: {} bytes", self.max_response_size)?;
        writeln!(f, "  data interval: {:?}", self.data_interval)?;
        writeln!(f, "  temperature interval: {:?}", self.temperature_interval)?;
        writeln!(f, "  dose report interval: {:?}", self.dose_report_interval)?;
        write!(f, "  write policy: {:?}", self.write_policy)
    }
}
