//! Outbound helper that frames commands and splits them into link fragments.
//!
//! [`CommandFramer`] owns the session's sequence counter. Every call to
//! [`CommandFramer::frame`] consumes one sequence number, builds the
//! length-prefixed packet and cuts it into fixed-size [`FragmentBatch`]
//! chunks. Fragments are zero-copy slices of the encoded packet.

use std::num::NonZeroUsize;

use bytes::Bytes;
use log::debug;

use super::{FramingError, OutPacket, SequenceNumber};
use crate::command::Request;

/// Fragment size imposed by the instrument's wireless link.
pub const DEFAULT_FRAGMENT_SIZE: NonZeroUsize = NonZeroUsize::new(18).expect("non-zero");

/// Frames commands and splits them into link-sized fragments.
#[derive(Debug)]
pub struct CommandFramer {
    fragment_size: NonZeroUsize,
    counter: u8,
}

impl CommandFramer {
    /// Create a framer producing fragments of at most `fragment_size` bytes.
    #[must_use]
    pub const fn new(fragment_size: NonZeroUsize) -> Self { Self::with_counter(fragment_size, 0) }

    /// Create a framer whose next command uses `counter` as its session counter.
    #[must_use]
    pub const fn with_counter(fragment_size: NonZeroUsize, counter: u8) -> Self {
        Self {
            fragment_size,
            counter,
        }
    }

    /// Return the maximum fragment size in bytes.
    #[must_use]
    pub const fn fragment_size(&self) -> NonZeroUsize { self.fragment_size }

    /// Consume and return the next sequence number.
    ///
    /// The counter advances regardless of whether the command is later
    /// delivered.
    pub fn next_sequence(&mut self) -> SequenceNumber {
        let sequence = SequenceNumber::from_counter(self.counter);
        self.counter = self.counter.wrapping_add(1);
        sequence
    }

    /// Frame `payload` under `command_code` and split it into fragments.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::PayloadTooLarge`] if the payload cannot be
    /// described by the length prefix. The sequence number is consumed even
    /// then.
    pub fn frame(
        &mut self,
        command_code: u16,
        payload: impl Into<Bytes>,
    ) -> Result<FragmentBatch, FramingError> {
        let packet = OutPacket::new(command_code, self.next_sequence(), payload);
        self.split(&packet)
    }

    /// Frame one of the session's fixed requests.
    ///
    /// # Errors
    ///
    /// Propagates [`FramingError`] from [`CommandFramer::frame`]; fixed
    /// requests carry four-byte payloads so this does not fail in practice.
    pub fn frame_request(&mut self, request: Request) -> Result<FragmentBatch, FramingError> {
        self.frame(
            request.command().code(),
            Bytes::copy_from_slice(&request.payload()),
        )
    }

    /// Encode `packet` and cut it into fragments.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::PayloadTooLarge`] if the packet cannot be
    /// encoded.
    pub fn split(&self, packet: &OutPacket) -> Result<FragmentBatch, FramingError> {
        let encoded = packet.encode()?;
        let max = self.fragment_size.get();
        let fragments: Vec<Bytes> = (0..encoded.len())
            .step_by(max)
            .map(|offset| encoded.slice(offset..(offset + max).min(encoded.len())))
            .collect();

        debug!(
            "framed command: code={:#06x}, sequence={}, packet_len={}, fragments={}",
            packet.command_code(),
            packet.sequence(),
            encoded.len(),
            fragments.len()
        );

        Ok(FragmentBatch::new(
            packet.command_code(),
            packet.sequence(),
            fragments,
        ))
    }
}

impl Default for CommandFramer {
    fn default() -> Self { Self::new(DEFAULT_FRAGMENT_SIZE) }
}

/// Fragments produced for a single framed command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentBatch {
    command_code: u16,
    sequence: SequenceNumber,
    fragments: Vec<Bytes>,
}

impl FragmentBatch {
    fn new(command_code: u16, sequence: SequenceNumber, fragments: Vec<Bytes>) -> Self {
        debug_assert!(!fragments.is_empty(), "framed packets are never empty");
        Self {
            command_code,
            sequence,
            fragments,
        }
    }

    /// Command code of the framed packet.
    #[must_use]
    pub const fn command_code(&self) -> u16 { self.command_code }

    /// Sequence number stamped into the packet.
    #[must_use]
    pub const fn sequence(&self) -> SequenceNumber { self.sequence }

    /// Return the fragments as a slice.
    #[must_use]
    pub fn fragments(&self) -> &[Bytes] { &self.fragments }

    /// Number of fragments in the batch.
    #[expect(
        clippy::len_without_is_empty,
        reason = "batches are guaranteed non-empty"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Total encoded packet length across all fragments.
    #[must_use]
    pub fn packet_len(&self) -> usize { self.fragments.iter().map(Bytes::len).sum() }

    /// Consume the batch, returning all fragments.
    #[must_use]
    pub fn into_fragments(self) -> Vec<Bytes> { self.fragments }
}

impl IntoIterator for FragmentBatch {
    type Item = Bytes;
    type IntoIter = std::vec::IntoIter<Bytes>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.into_iter() }
}
