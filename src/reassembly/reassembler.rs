//! Inbound helper that stitches notification fragments into one response.
//!
//! [`ResponseReassembler`] holds at most one [`ResponseBuffer`]. The first
//! fragment after a reset supplies the declared size; completion is purely a
//! byte count. A response declaring more than the cap is rejected and its
//! remaining bytes are skipped, so its continuation fragments are never read
//! as size prefixes. Stalls are not pushed: the host's tick calls
//! [`ResponseReassembler::poll_stall`] with its clock reading.

use std::{num::NonZeroUsize, time::Duration};

use bytes::Buf;
use log::debug;

use super::{ReassembledResponse, ReassemblyError, ResponseBuffer};
use crate::{clock::Timestamp, framer::LENGTH_PREFIX_SIZE};

/// Largest response the instrument is expected to send.
pub const DEFAULT_MAX_RESPONSE_SIZE: NonZeroUsize = NonZeroUsize::new(4096).expect("non-zero");
/// Time allowed for a partially received response to complete.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of feeding one fragment into the reassembler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReassemblyState {
    /// More bytes are required before the response is complete.
    Incomplete,
    /// The fragment completed the response; the reassembler has been reset.
    Complete(ReassembledResponse),
    /// The fragment was refused; no buffer is active.
    Rejected(ReassemblyError),
    /// The fragment belonged to a rejected response and was dropped.
    Discarding {
        /// Declared bytes of the rejected response still to come.
        remaining: usize,
    },
}

impl ReassemblyState {
    /// Whether this state carries a complete response.
    #[must_use]
    pub const fn is_complete(&self) -> bool { matches!(self, Self::Complete(_)) }
}

/// Details of a response discarded after waiting too long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StalledResponse {
    /// Size the response declared.
    pub expected_size: u32,
    /// Bytes received before the stall.
    pub received: usize,
    /// Time since the wait clock started.
    pub waited: Duration,
}

/// Single-slot reassembler with a polled stall timeout.
#[derive(Debug)]
pub struct ResponseReassembler {
    max_response_size: NonZeroUsize,
    timeout: Duration,
    buffer: Option<ResponseBuffer>,
    discard_remaining: usize,
    wait_started: Option<Timestamp>,
}

impl ResponseReassembler {
    /// Create a reassembler enforcing `max_response_size` and `timeout`.
    #[must_use]
    pub const fn new(max_response_size: NonZeroUsize, timeout: Duration) -> Self {
        Self {
            max_response_size,
            timeout,
            buffer: None,
            discard_remaining: 0,
            wait_started: None,
        }
    }

    /// Discard any stale buffer and start the response-wait clock.
    ///
    /// Called whenever a command is framed, before its fragments are sent.
    pub fn start_wait(&mut self, now: Timestamp) {
        self.buffer = None;
        self.discard_remaining = 0;
        self.wait_started = Some(now);
    }

    /// Discard any buffered bytes and clear the wait clock.
    pub fn reset(&mut self) {
        self.buffer = None;
        self.discard_remaining = 0;
        self.wait_started = None;
    }

    /// Feed one inbound fragment.
    ///
    /// On completion the response is trimmed to its declared size and the
    /// reassembler is reset, wait clock included.
    pub fn push(&mut self, fragment: &[u8], now: Timestamp) -> ReassemblyState {
        if self.discard_remaining > 0 {
            return self.discard(fragment);
        }
        let buffer = match self.buffer.take() {
            Some(mut buffer) => {
                buffer.push(fragment);
                buffer
            }
            None => match self.begin(fragment, now) {
                Ok(buffer) => buffer,
                Err(err) => {
                    if let ReassemblyError::ResponseTooLarge { declared, .. } = err {
                        let declared = usize::try_from(declared).unwrap_or(usize::MAX);
                        let carried = fragment.len().saturating_sub(LENGTH_PREFIX_SIZE);
                        self.discard_remaining = declared.saturating_sub(carried);
                    }
                    return ReassemblyState::Rejected(err);
                }
            },
        };

        debug!(
            "response progress: received={}, expected={}",
            buffer.received(),
            buffer.expected_size()
        );
        if !buffer.is_complete() {
            self.buffer = Some(buffer);
            return ReassemblyState::Incomplete;
        }

        self.reset();
        ReassemblyState::Complete(buffer.into_response())
    }

    fn discard(&mut self, fragment: &[u8]) -> ReassemblyState {
        self.discard_remaining = self.discard_remaining.saturating_sub(fragment.len());
        debug!(
            "oversized response fragment dropped: len={}, remaining={}",
            fragment.len(),
            self.discard_remaining
        );
        ReassemblyState::Discarding {
            remaining: self.discard_remaining,
        }
    }

    fn begin(&self, fragment: &[u8], now: Timestamp) -> Result<ResponseBuffer, ReassemblyError> {
        if fragment.len() < LENGTH_PREFIX_SIZE {
            return Err(ReassemblyError::FirstFragmentTooShort {
                len: fragment.len(),
            });
        }
        let mut rest = fragment;
        let declared = rest.get_u32_le();
        let limit = self.max_response_size;
        let Some(capacity) = usize::try_from(declared)
            .ok()
            .filter(|size| *size <= limit.get())
        else {
            return Err(ReassemblyError::ResponseTooLarge { declared, limit });
        };

        debug!("new response: expected_size={declared}");
        Ok(ResponseBuffer::new(declared, rest, capacity, now))
    }

    /// Discard the in-flight response if the wait has exceeded the timeout.
    ///
    /// A response is only considered stalled once at least one fragment has
    /// arrived. Returns the discarded response's details, after which the
    /// next fragment is treated as the first of a new response. Skipping of
    /// an oversized response also ends once the timeout has passed.
    pub fn poll_stall(&mut self, now: Timestamp) -> Option<StalledResponse> {
        let started = self.wait_started?;
        let waited = now.saturating_duration_since(started);
        if waited <= self.timeout {
            return None;
        }
        if self.discard_remaining > 0 {
            debug!(
                "oversized response skip abandoned: remaining={}",
                self.discard_remaining
            );
            self.discard_remaining = 0;
        }
        let buffer = self.buffer.take()?;
        self.wait_started = None;
        Some(StalledResponse {
            expected_size: buffer.expected_size(),
            received: buffer.received(),
            waited,
        })
    }

    /// Borrow the in-flight buffer, if any.
    #[must_use]
    pub fn buffer(&self) -> Option<&ResponseBuffer> { self.buffer.as_ref() }

    /// Bytes of a rejected oversized response still to be skipped.
    #[must_use]
    pub const fn discard_remaining(&self) -> usize { self.discard_remaining }

    /// When the wait clock was last started, if it is running.
    #[must_use]
    pub const fn wait_started(&self) -> Option<Timestamp> { self.wait_started }
}

impl Default for ResponseReassembler {
    fn default() -> Self { Self::new(DEFAULT_MAX_RESPONSE_SIZE, DEFAULT_RESPONSE_TIMEOUT) }
}
