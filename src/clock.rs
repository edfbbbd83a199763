//! Monotonic millisecond timestamps supplied by the host's tick source.
//!
//! The session never reads a clock itself. Every entry point receives a
//! [`Timestamp`] so tests can drive time explicitly.

use std::time::Duration;

use derive_more::{Display, From, Into};

/// Milliseconds on the host's monotonic clock.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use radwire::clock::Timestamp;
///
/// let start = Timestamp::from_millis(1_000);
/// let later = Timestamp::from_millis(6_000);
/// assert_eq!(later.saturating_duration_since(start), Duration::from_secs(5));
/// assert_eq!(start.saturating_duration_since(later), Duration::ZERO);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}ms")]
pub struct Timestamp(u64);

impl Timestamp {
    /// The origin of the host clock.
    pub const ZERO: Self = Self(0);

    /// Construct a timestamp from a millisecond reading.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self { Self(millis) }

    /// Return the millisecond reading.
    #[must_use]
    pub const fn as_millis(self) -> u64 { self.0 }

    /// Time elapsed between `earlier` and `self`, or zero if `earlier` is later.
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}
