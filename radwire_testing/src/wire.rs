//! Builders for inbound responses as the instrument sends them.

use bytes::{BufMut, BytesMut};
use radwire::command::Command;

/// Encode a response header followed by `payload`, without the size prefix.
#[must_use]
pub fn response_body(command: Command, sequence: u8, retcode: u32, payload: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(8 + payload.len());
    buf.put_u16_le(command.code());
    buf.put_u8(0);
    buf.put_u8(sequence);
    buf.put_u32_le(retcode);
    buf.put_slice(payload);
    buf.to_vec()
}

/// Prefix `body` with its little-endian `u32` size.
#[must_use]
pub fn with_size_prefix(body: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(4 + body.len());
    buf.put_u32_le(u32::try_from(body.len()).expect("test bodies fit in u32"));
    buf.put_slice(body);
    buf.to_vec()
}

/// Encode a full inbound response, size prefix included.
#[must_use]
pub fn response_wire(command: Command, sequence: u8, retcode: u32, payload: &[u8]) -> Vec<u8> {
    with_size_prefix(&response_body(command, sequence, retcode, payload))
}

/// Encode one record header followed by `body`.
#[must_use]
pub fn record(record_seq: u8, entity_id: u8, group_id: u8, body: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(7 + body.len());
    buf.put_u8(record_seq);
    buf.put_u8(entity_id);
    buf.put_u8(group_id);
    buf.put_u32_le(u32::from(record_seq) * 100);
    buf.put_slice(body);
    buf.to_vec()
}

/// Encode a real-time record carrying `count_rate` and `dose_rate`.
#[must_use]
pub fn realtime_record(record_seq: u8, count_rate: f32, dose_rate: f32) -> Vec<u8> {
    let mut body = BytesMut::with_capacity(19);
    body.put_u32_le(0);
    body.put_f32_le(count_rate);
    body.put_f32_le(dose_rate);
    body.put_bytes(0, 7);
    record(record_seq, 0, 0, &body)
}
