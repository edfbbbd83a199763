//! Storage for the single in-flight response.

use crate::clock::Timestamp;

/// In-progress reassembly of one inbound response.
///
/// `expected_size` is fixed by the first fragment. Bytes past it are kept as
/// trailing slack but never counted as received.
#[derive(Debug)]
pub struct ResponseBuffer {
    expected_size: u32,
    bytes: Vec<u8>,
    started_at: Timestamp,
}

impl ResponseBuffer {
    pub(crate) fn new(
        expected_size: u32,
        first: &[u8],
        capacity: usize,
        started_at: Timestamp,
    ) -> Self {
        let mut bytes = Vec::with_capacity(capacity);
        bytes.extend_from_slice(first);
        Self {
            expected_size,
            bytes,
            started_at,
        }
    }

    pub(crate) fn push(&mut self, fragment: &[u8]) { self.bytes.extend_from_slice(fragment); }

    /// Size declared by the response's length prefix.
    #[must_use]
    pub const fn expected_size(&self) -> u32 { self.expected_size }

    /// Bytes received so far, capped at the declared size.
    #[must_use]
    pub fn received(&self) -> usize { self.bytes.len().min(self.expected_len()) }

    /// When the first fragment arrived.
    #[must_use]
    pub const fn started_at(&self) -> Timestamp { self.started_at }

    /// Whether the declared size has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.bytes.len() >= self.expected_len() }

    fn expected_len(&self) -> usize { usize::try_from(self.expected_size).unwrap_or(usize::MAX) }

    pub(crate) fn into_response(self) -> ReassembledResponse {
        let expected = self.expected_len();
        let mut bytes = self.bytes;
        let slack = bytes.len().saturating_sub(expected);
        bytes.truncate(expected);
        ReassembledResponse { bytes, slack }
    }
}

/// A complete response, trimmed to its declared size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledResponse {
    bytes: Vec<u8>,
    slack: usize,
}

impl ReassembledResponse {
    /// Borrow the response bytes (header and payload, size prefix excluded).
    #[must_use]
    pub fn bytes(&self) -> &[u8] { &self.bytes }

    /// Number of surplus bytes that arrived past the declared size.
    #[must_use]
    pub const fn slack(&self) -> usize { self.slack }

    /// Consume the response, returning the owned bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> { self.bytes }
}
