//! Tests for inbound response reassembly, limits and stall handling.

use std::{num::NonZeroUsize, time::Duration};

use proptest::prelude::*;
use rstest::{fixture, rstest};

use super::{ReassemblyError, ReassemblyState, ResponseReassembler};
use crate::{
    clock::Timestamp,
    command::Command,
    test_helpers::{response_wire, with_size_prefix},
};

#[fixture]
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
fn reassembler() -> ResponseReassembler { ResponseReassembler::default() }

/// Split `wire` into `chunk`-sized fragments. The first fragment always
/// carries the whole size prefix, as the device never splits it.
fn feed(
    reassembler: &mut ResponseReassembler,
    wire: &[u8],
    chunk: usize,
) -> Vec<ReassemblyState> {
    let (first, rest) = wire.split_at(chunk.max(4).min(wire.len()));
    std::iter::once(first)
        .chain(rest.chunks(chunk))
        .map(|fragment| reassembler.push(fragment, Timestamp::ZERO))
        .collect()
}

fn completed(states: Vec<ReassemblyState>) -> Vec<u8> {
    let mut complete = states.into_iter().filter_map(|state| match state {
        ReassemblyState::Complete(response) => Some(response.into_bytes()),
        _ => None,
    });
    let bytes = complete.next().expect("response should complete");
    assert!(complete.next().is_none(), "only one completion expected");
    bytes
}

#[rstest]
fn single_fragment_completes_immediately(mut reassembler: ResponseReassembler) {
    let wire = response_wire(Command::ReadVirtualRegister, 0x81, 0, &[1, 2, 3, 4]);
    let state = reassembler.push(&wire, Timestamp::ZERO);

    let ReassemblyState::Complete(response) = state else {
        panic!("expected completion, got {state:?}");
    };
    assert_eq!(response.bytes(), &wire[4..]);
    assert_eq!(response.slack(), 0);
    assert!(reassembler.buffer().is_none());
}

#[rstest]
fn fragments_accumulate_until_declared_size(mut reassembler: ResponseReassembler) {
    let payload: Vec<u8> = (0..30).collect();
    let wire = response_wire(Command::ReadVirtualString, 0x80, 1, &payload);
    let states = feed(&mut reassembler, &wire, 18);

    assert_eq!(states.len(), 3);
    assert_eq!(states[0], ReassemblyState::Incomplete);
    assert_eq!(states[1], ReassemblyState::Incomplete);
    assert_eq!(completed(states), wire[4..].to_vec());
}

#[rstest]
fn short_first_fragment_is_rejected_and_buffer_stays_empty(mut reassembler: ResponseReassembler) {
    let state = reassembler.push(&[0x08, 0x00], Timestamp::ZERO);
    assert_eq!(
        state,
        ReassemblyState::Rejected(ReassemblyError::FirstFragmentTooShort { len: 2 })
    );
    assert!(reassembler.buffer().is_none());

    // The next fragment is still treated as a fresh first fragment.
    let wire = response_wire(Command::ReadVirtualRegister, 0x80, 1, &[]);
    assert!(reassembler.push(&wire, Timestamp::ZERO).is_complete());
}

#[rstest]
fn bare_size_prefix_starts_a_response(mut reassembler: ResponseReassembler) {
    let wire = response_wire(Command::ReadVirtualRegister, 0x80, 0, &[9, 9, 9, 9]);
    assert_eq!(reassembler.push(&wire[..4], Timestamp::ZERO), ReassemblyState::Incomplete);
    assert_eq!(reassembler.buffer().map(|b| b.expected_size()), Some(12));

    let ReassemblyState::Complete(response) = reassembler.push(&wire[4..], Timestamp::ZERO) else {
        panic!("remaining bytes should complete the response");
    };
    assert_eq!(response.bytes(), &wire[4..]);
}

#[rstest]
fn surplus_bytes_are_trimmed_as_slack(mut reassembler: ResponseReassembler) {
    let mut wire = response_wire(Command::ReadVirtualRegister, 0x80, 0, &[1, 2, 3, 4]);
    wire.extend_from_slice(&[0xEE; 5]);

    let ReassemblyState::Complete(response) = reassembler.push(&wire, Timestamp::ZERO) else {
        panic!("response should complete");
    };
    assert_eq!(response.bytes().len(), 12);
    assert_eq!(response.slack(), 5);
}

#[rstest]
fn received_count_never_exceeds_declared_size(mut reassembler: ResponseReassembler) {
    let body = [0_u8; 20];
    let wire = with_size_prefix(&body);
    assert_eq!(reassembler.push(&wire[..10], Timestamp::ZERO), ReassemblyState::Incomplete);
    let buffer = reassembler.buffer().expect("buffer active");
    assert_eq!(buffer.received(), 6);
    assert!(buffer.received() <= 20);
}

#[test]
fn declared_size_above_cap_is_rejected() {
    let limit = NonZeroUsize::new(64).expect("non-zero");
    let mut reassembler = ResponseReassembler::new(limit, Duration::from_secs(30));
    let state = reassembler.push(&[0x41, 0x00, 0x00, 0x00, 0xAA], Timestamp::ZERO);

    assert_eq!(
        state,
        ReassemblyState::Rejected(ReassemblyError::ResponseTooLarge {
            declared: 65,
            limit,
        })
    );
    assert!(reassembler.buffer().is_none());
}

fn small_cap() -> ResponseReassembler {
    let limit = NonZeroUsize::new(64).expect("non-zero");
    ResponseReassembler::new(limit, Duration::from_secs(30))
}

#[test]
fn oversized_response_is_skipped_without_losing_sync() {
    let mut reassembler = small_cap();
    let oversized = response_wire(Command::ReadVirtualString, 0x80, 1, &[0x20; 92]);
    let states = feed(&mut reassembler, &oversized, 18);

    assert!(matches!(
        states.first(),
        Some(ReassemblyState::Rejected(ReassemblyError::ResponseTooLarge {
            declared: 100,
            ..
        }))
    ));
    let remaining: Vec<usize> = states[1..]
        .iter()
        .map(|state| match state {
            ReassemblyState::Discarding { remaining } => *remaining,
            other => panic!("continuation should be skipped, got {other:?}"),
        })
        .collect();
    assert_eq!(remaining, vec![68, 50, 32, 14, 0]);
    assert!(reassembler.buffer().is_none());

    let reply = response_wire(Command::ReadVirtualRegister, 0x81, 0, &[1, 2, 3, 4]);
    let ReassemblyState::Complete(response) = reassembler.push(&reply, Timestamp::ZERO) else {
        panic!("reply after the skipped response should complete");
    };
    assert_eq!(response.bytes(), &reply[4..]);
}

#[test]
fn new_wait_ends_skipping_of_an_oversized_response() {
    let mut reassembler = small_cap();
    let oversized = response_wire(Command::ReadVirtualString, 0x80, 1, &[0; 92]);
    assert!(matches!(
        reassembler.push(&oversized[..18], Timestamp::ZERO),
        ReassemblyState::Rejected(_)
    ));
    assert_eq!(reassembler.discard_remaining(), 86);

    reassembler.start_wait(Timestamp::from_millis(5_000));
    assert_eq!(reassembler.discard_remaining(), 0);
    let reply = response_wire(Command::ReadVirtualRegister, 0x81, 0, &[0; 4]);
    assert!(
        reassembler
            .push(&reply, Timestamp::from_millis(5_010))
            .is_complete()
    );
}

#[test]
fn timeout_ends_skipping_of_an_oversized_response() {
    let mut reassembler = small_cap();
    reassembler.start_wait(Timestamp::ZERO);
    let oversized = response_wire(Command::ReadVirtualString, 0x80, 1, &[0; 92]);
    reassembler.push(&oversized[..18], Timestamp::ZERO);

    assert!(reassembler.poll_stall(Timestamp::from_millis(30_000)).is_none());
    assert_eq!(reassembler.discard_remaining(), 86);
    assert!(reassembler.poll_stall(Timestamp::from_millis(30_001)).is_none());
    assert_eq!(reassembler.discard_remaining(), 0);
}

#[rstest]
fn stalled_response_is_discarded_after_timeout(mut reassembler: ResponseReassembler) {
    let start = Timestamp::from_millis(10_000);
    reassembler.start_wait(start);
    let wire = response_wire(Command::ReadVirtualString, 0x80, 1, &[0; 40]);
    assert_eq!(reassembler.push(&wire[..18], start), ReassemblyState::Incomplete);

    assert!(
        reassembler
            .poll_stall(Timestamp::from_millis(40_000))
            .is_none(),
        "exactly the timeout is not yet a stall"
    );

    let stalled = reassembler
        .poll_stall(Timestamp::from_millis(40_001))
        .expect("wait beyond timeout should stall");
    assert_eq!(stalled.expected_size, 48);
    assert_eq!(stalled.received, 14);
    assert_eq!(stalled.waited, Duration::from_millis(30_001));
    assert!(reassembler.buffer().is_none());
    assert!(reassembler.wait_started().is_none());

    // Subsequent fragments behave as a fresh first fragment.
    let fresh = response_wire(Command::ReadVirtualRegister, 0x81, 0, &[0; 4]);
    assert!(
        reassembler
            .push(&fresh, Timestamp::from_millis(40_002))
            .is_complete()
    );
}

#[rstest]
fn idle_wait_without_bytes_is_not_a_stall(mut reassembler: ResponseReassembler) {
    reassembler.start_wait(Timestamp::ZERO);
    assert!(
        reassembler
            .poll_stall(Timestamp::from_millis(60_000))
            .is_none()
    );
    assert_eq!(reassembler.wait_started(), Some(Timestamp::ZERO));
}

#[rstest]
fn starting_a_new_wait_discards_stale_bytes(mut reassembler: ResponseReassembler) {
    let wire = response_wire(Command::ReadVirtualString, 0x80, 1, &[0; 40]);
    assert_eq!(reassembler.push(&wire[..18], Timestamp::ZERO), ReassemblyState::Incomplete);

    reassembler.start_wait(Timestamp::from_millis(5_000));
    assert!(reassembler.buffer().is_none());
    assert_eq!(reassembler.wait_started(), Some(Timestamp::from_millis(5_000)));
}

#[rstest]
fn completion_clears_the_wait_clock(mut reassembler: ResponseReassembler) {
    reassembler.start_wait(Timestamp::ZERO);
    let wire = response_wire(Command::ReadVirtualRegister, 0x80, 0, &[0; 4]);
    assert!(reassembler.push(&wire, Timestamp::ZERO).is_complete());
    assert!(reassembler.wait_started().is_none());
}

proptest! {
    #[test]
    fn reassembly_is_invariant_to_fragmentation(
        payload in proptest::collection::vec(any::<u8>(), 0..300),
        retcode in 0_u32..3,
    ) {
        let wire = response_wire(Command::ReadVirtualString, 0x83, retcode, &payload);
        let whole = completed(feed(&mut ResponseReassembler::default(), &wire, wire.len()));
        let by_byte = completed(feed(&mut ResponseReassembler::default(), &wire, 1));
        let by_link = completed(feed(&mut ResponseReassembler::default(), &wire, 18));

        prop_assert_eq!(&whole, &wire[4..].to_vec());
        prop_assert_eq!(&by_byte, &whole);
        prop_assert_eq!(&by_link, &whole);
    }
}
