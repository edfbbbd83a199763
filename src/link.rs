//! Boundary to the host's wireless link.
//!
//! The session never talks to a radio. It hands each [`FragmentBatch`] to
//! [`transmit`], which writes fragments through a [`Link`] and records every
//! failure in a [`TransmitReport`]. Whether a failed fragment ends the batch
//! is decided by [`WritePolicy`], leaving framing untouched.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{framer::FragmentBatch, metrics};

/// Failures reported by a host link.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// The command channel has not been discovered yet.
    #[error("services not discovered")]
    NotReady,
    /// The link is gone.
    #[error("link closed")]
    Closed,
    /// The host rejected the write.
    #[error("write failed: {0}")]
    Write(String),
}

/// Host-provided write side of the wireless link.
pub trait Link {
    /// Write one fragment to the instrument's command characteristic.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] if the host could not queue the fragment.
    fn write(&mut self, fragment: &[u8]) -> Result<(), LinkError>;

    /// Whether the command channel is ready for writes.
    fn is_services_discovered(&self) -> bool;
}

impl<L: Link + ?Sized> Link for &mut L {
    fn write(&mut self, fragment: &[u8]) -> Result<(), LinkError> { (**self).write(fragment) }

    fn is_services_discovered(&self) -> bool { (**self).is_services_discovered() }
}

impl<L: Link + ?Sized> Link for Box<L> {
    fn write(&mut self, fragment: &[u8]) -> Result<(), LinkError> { (**self).write(fragment) }

    fn is_services_discovered(&self) -> bool { (**self).is_services_discovered() }
}

/// What to do with the rest of a batch after a fragment write fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Keep writing the remaining fragments.
    #[default]
    ContinueOnFailure,
    /// Stop at the first failed fragment.
    AbortOnFailure,
}

/// A fragment the link refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentFailure {
    /// Position of the fragment within its batch.
    pub index: usize,
    /// Byte offset of the fragment within the packet.
    pub offset: usize,
    /// Error reported by the link.
    pub error: LinkError,
}

/// Outcome of writing one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransmitReport {
    /// Fragments in the batch.
    pub total: usize,
    /// Fragments the link accepted.
    pub sent: usize,
    /// Fragments the link refused, in order.
    pub failures: Vec<FragmentFailure>,
    /// Whether writing stopped before the last fragment.
    pub aborted: bool,
}

impl TransmitReport {
    /// Whether every fragment was accepted.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.sent == self.total }
}

/// Write every fragment of `batch` to `link` under `policy`.
pub fn transmit<L: Link + ?Sized>(
    link: &mut L,
    batch: &FragmentBatch,
    policy: WritePolicy,
) -> TransmitReport {
    let mut report = TransmitReport {
        total: batch.len(),
        ..TransmitReport::default()
    };
    let mut offset = 0;
    for (index, fragment) in batch.fragments().iter().enumerate() {
        match link.write(fragment) {
            Ok(()) => report.sent += 1,
            Err(error) => {
                warn!(
                    "fragment write failed: sequence={}, index={index}, offset={offset}, error={error}",
                    batch.sequence()
                );
                report.failures.push(FragmentFailure {
                    index,
                    offset,
                    error,
                });
                if policy == WritePolicy::AbortOnFailure {
                    report.aborted = index + 1 < report.total;
                    break;
                }
            }
        }
        offset += fragment.len();
    }
    metrics::inc_fragments_sent(u64::try_from(report.sent).unwrap_or(u64::MAX));
    debug!(
        "batch written: sequence={}, sent={}, total={}",
        batch.sequence(),
        report.sent,
        report.total
    );
    report
}
