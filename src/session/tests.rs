//! Tests for the session lifecycle, request cadence and response dispatch.

use std::time::Duration;

use rstest::{fixture, rstest};

use super::{NotificationOutcome, ResponseError, Session, SessionState};
use crate::{
    clock::Timestamp,
    command::{Command, Request, VirtualRegister},
    config::{ConfigError, SessionConfig},
    reassembly::ReassemblyError,
    response::{DecodeError, ResponseBody},
    telemetry::Metric,
    test_helpers::{MemoryLink, ReadingLog, realtime_record, response_wire},
};

type TestSession = Session<MemoryLink, ReadingLog>;

fn at(millis: u64) -> Timestamp { Timestamp::from_millis(millis) }

#[fixture]
fn session() -> TestSession {
    Session::new(
        SessionConfig::default(),
        MemoryLink::default(),
        ReadingLog::default(),
    )
    .expect("default config is valid")
}

/// A session that has sent its handshake, with the link's log cleared.
#[fixture]
fn operational(mut session: TestSession) -> TestSession {
    session.on_services_discovered();
    session.on_subscribed(Timestamp::ZERO);
    session.link_mut().writes.clear();
    session
}

fn deliver(session: &mut TestSession, wire: &[u8], now: Timestamp) -> Vec<NotificationOutcome> {
    wire.chunks(18)
        .map(|fragment| session.on_notification(fragment, now))
        .collect()
}

fn last_outcome(outcomes: Vec<NotificationOutcome>) -> NotificationOutcome {
    outcomes.into_iter().last().expect("at least one fragment")
}

#[test]
fn invalid_config_is_refused() {
    let config = SessionConfig {
        data_interval: Duration::ZERO,
        ..SessionConfig::default()
    };
    let err = Session::new(config, MemoryLink::default(), ReadingLog::default())
        .expect_err("zero data interval must be refused");
    assert_eq!(
        err,
        ConfigError::ZeroDuration {
            field: "data_interval"
        }
    );
}

#[rstest]
fn handshake_is_sent_once_notifications_are_enabled(mut session: TestSession) {
    assert_eq!(session.state(), SessionState::Disconnected);
    session.on_services_discovered();
    assert_eq!(session.state(), SessionState::ServicesDiscovered);

    let report = session
        .on_subscribed(Timestamp::ZERO)
        .expect("handshake sent");
    assert!(report.is_complete());
    assert_eq!(session.state(), SessionState::Operational);
    assert_eq!(
        session.link().writes,
        vec![vec![
            0x08, 0x00, 0x00, 0x00, 0x17, 0x00, 0x00, 0x80, 0x01, 0xFF, 0x12, 0xFF
        ]]
    );
}

#[rstest]
fn subscription_before_discovery_is_ignored(mut session: TestSession) {
    assert!(session.on_subscribed(Timestamp::ZERO).is_none());
    assert_eq!(session.state(), SessionState::Disconnected);
    assert!(session.link().writes.is_empty());
}

#[rstest]
fn requests_follow_their_intervals(mut operational: TestSession) {
    let temperature = Request::Register(VirtualRegister::Temperature);

    let first = operational.tick(at(100));
    assert_eq!(first.issued, vec![Request::DataBuffer, temperature]);
    assert!(operational.tick(at(5_099)).issued.is_empty());
    assert_eq!(operational.tick(at(5_100)).issued, vec![Request::DataBuffer]);
    assert_eq!(
        operational.tick(at(30_100)).issued,
        vec![Request::DataBuffer, temperature]
    );
    assert_eq!(operational.link().writes.len(), 5);
}

#[rstest]
fn ticks_before_operational_issue_nothing(mut session: TestSession) {
    session.on_services_discovered();
    assert!(session.tick(at(60_000)).issued.is_empty());
    assert!(session.link().writes.is_empty());
}

#[rstest]
fn sequence_advances_per_command(mut operational: TestSession) {
    operational.tick(at(0));
    let sequences: Vec<u8> = operational.link().writes.iter().map(|w| w[7]).collect();
    // 0x80 went to the handshake.
    assert_eq!(sequences, vec![0x81, 0x82]);
}

#[rstest]
fn data_response_publishes_radiation_readings(mut operational: TestSession) {
    operational.request(Request::DataBuffer, at(1_000));
    let payload = realtime_record(1, 5.0, 1e-7);
    let wire = response_wire(Command::ReadVirtualString, 0x81, 1, &payload);

    let outcome = last_outcome(deliver(&mut operational, &wire, at(1_200)));
    let NotificationOutcome::Dispatched(response) = outcome else {
        panic!("expected dispatch, got {outcome:?}");
    };
    assert!(matches!(response.body, ResponseBody::Records(_)));

    let readings = operational.sink();
    assert_eq!(readings.values(Metric::CountRate), vec![5.0]);
    assert_eq!(readings.values(Metric::CountRateCpm), vec![300.0]);
    let dose_rate = readings.values(Metric::DoseRate);
    assert_eq!(dose_rate.len(), 1);
    assert!((dose_rate[0] - 1.0).abs() < 1e-4);
    assert!(readings.values(Metric::DoseAccumulated).is_empty());
}

#[rstest]
fn accumulated_dose_is_reported_after_the_interval(mut operational: TestSession) {
    let wire = response_wire(
        Command::ReadVirtualString,
        0x81,
        1,
        &realtime_record(1, 10.0, 3.6e-5),
    );
    deliver(&mut operational, &wire, at(1_000));
    deliver(&mut operational, &wire, at(61_000));

    // 360 nSv/h for one minute.
    assert!((operational.accumulated_dose() - 6.0).abs() < 1e-2);
    let reported = operational.sink().values(Metric::DoseAccumulated);
    assert_eq!(reported.len(), 1);
    assert!((reported[0] - 0.006).abs() < 1e-5);
}

#[rstest]
#[case(21.5, Some(21.5))]
#[case(0.0, None)]
#[case(150.0, None)]
fn temperature_is_filtered_to_plausible_values(
    mut operational: TestSession,
    #[case] value: f32,
    #[case] published: Option<f32>,
) {
    operational.request(Request::Register(VirtualRegister::Temperature), at(0));
    let wire = response_wire(Command::ReadVirtualRegister, 0x81, 0, &value.to_le_bytes());

    let outcome = last_outcome(deliver(&mut operational, &wire, at(10)));
    assert!(matches!(outcome, NotificationOutcome::Dispatched(_)));
    assert_eq!(
        operational.sink().values(Metric::Temperature),
        published.into_iter().collect::<Vec<_>>()
    );
}

#[rstest]
fn device_dose_register_is_published_unfiltered(mut operational: TestSession) {
    operational.request(Request::Register(VirtualRegister::DoseAccumulated), at(0));
    let wire = response_wire(Command::ReadVirtualRegister, 0x81, 1, &(-3.0_f32).to_le_bytes());
    deliver(&mut operational, &wire, at(10));
    assert_eq!(operational.sink().values(Metric::DeviceDose), vec![-3.0]);
}

#[rstest]
fn register_value_without_request_is_dropped(mut operational: TestSession) {
    let wire = response_wire(Command::ReadVirtualRegister, 0x81, 0, &20.0_f32.to_le_bytes());
    assert_eq!(
        last_outcome(deliver(&mut operational, &wire, at(10))),
        NotificationOutcome::Dropped(ResponseError::UnsolicitedRegister)
    );
    assert!(operational.sink().0.is_empty());
}

#[rstest]
fn failing_retcode_drops_the_response(mut operational: TestSession) {
    let wire = response_wire(
        Command::ReadVirtualString,
        0x81,
        0,
        &realtime_record(1, 5.0, 0.0),
    );
    assert_eq!(
        last_outcome(deliver(&mut operational, &wire, at(10))),
        NotificationOutcome::Dropped(ResponseError::Decode(DecodeError::Rejected {
            command: Command::ReadVirtualString,
            retcode: 0,
        }))
    );
    assert!(operational.sink().0.is_empty());
}

#[rstest]
fn short_first_fragment_is_dropped(mut operational: TestSession) {
    assert_eq!(
        operational.on_notification(&[0x01, 0x02], at(0)),
        NotificationOutcome::Dropped(ResponseError::Reassembly(
            ReassemblyError::FirstFragmentTooShort { len: 2 }
        ))
    );
}

#[rstest]
fn empty_notification_is_ignored(mut operational: TestSession) {
    assert_eq!(operational.on_notification(&[], at(0)), NotificationOutcome::Pending);
}

#[test]
fn stalled_response_is_discarded_on_tick() {
    let config = SessionConfig {
        data_interval: Duration::from_secs(3600),
        temperature_interval: Duration::from_secs(3600),
        ..SessionConfig::default()
    };
    let mut session = Session::new(config, MemoryLink::default(), ReadingLog::default())
        .expect("long intervals are valid");
    session.on_services_discovered();
    session.on_subscribed(Timestamp::ZERO);
    session.tick(at(0));

    let wire = response_wire(Command::ReadVirtualString, 0x81, 1, &[0; 40]);
    assert_eq!(
        session.on_notification(&wire[..18], at(100)),
        NotificationOutcome::Pending
    );

    assert!(session.tick(at(30_000)).stalled.is_none());
    let outcome = session.tick(at(30_001));
    let stalled = outcome.stalled.expect("wait exceeded the timeout");
    assert_eq!(stalled.received, 14);
    assert_eq!(stalled.expected_size, 48);

    // The next response starts from an empty buffer.
    let fresh = response_wire(
        Command::ReadVirtualString,
        0x82,
        1,
        &realtime_record(1, 2.0, 0.0),
    );
    assert!(matches!(
        last_outcome(deliver(&mut session, &fresh, at(30_100))),
        NotificationOutcome::Dispatched(_)
    ));
}

#[rstest]
fn disconnect_clears_connection_state(mut operational: TestSession) {
    operational.tick(at(0));
    let wire = response_wire(Command::ReadVirtualString, 0x81, 1, &[0; 40]);
    operational.on_notification(&wire[..18], at(10));

    operational.on_disconnect();
    assert_eq!(operational.state(), SessionState::Disconnected);
    assert!(operational.tick(at(60_000)).issued.is_empty());

    // A late register reply no longer matches a pending read.
    let reply = response_wire(Command::ReadVirtualRegister, 0x83, 0, &20.0_f32.to_le_bytes());
    assert_eq!(
        last_outcome(deliver(&mut operational, &reply, at(60_010))),
        NotificationOutcome::Dropped(ResponseError::UnsolicitedRegister)
    );
}

#[rstest]
fn reconnect_restarts_the_schedule(mut operational: TestSession) {
    operational.tick(at(0));
    operational.on_disconnect();
    operational.on_services_discovered();
    operational.on_subscribed(at(2_000));

    let outcome = operational.tick(at(2_000));
    assert_eq!(outcome.issued.len(), 2);
}

#[rstest]
fn requests_wait_for_the_link(mut session: TestSession) {
    session.link_mut().ready = false;
    assert!(session.request(Request::DataBuffer, at(0)).is_none());
    assert!(session.link().writes.is_empty());

    session.link_mut().ready = true;
    session.request(Request::DataBuffer, at(0));
    // The refused request did not consume a sequence number.
    assert_eq!(session.link().writes[0][7], 0x80);
}

#[rstest]
fn dose_accessors_support_persistence(mut session: TestSession) {
    session.set_accumulated_dose(1234.5);
    assert_eq!(session.accumulated_dose(), 1234.5);
    session.on_disconnect();
    assert_eq!(session.accumulated_dose(), 1234.5);
    session.reset_accumulated_dose();
    assert_eq!(session.accumulated_dose(), 0.0);
}

#[rstest]
fn oversized_response_does_not_swallow_the_next_reply(mut operational: TestSession) {
    operational.tick(at(0));
    let oversized = response_wire(Command::ReadVirtualString, 0x80, 1, &vec![0x20; 4992]);
    let outcomes = deliver(&mut operational, &oversized, at(10));

    assert!(matches!(
        outcomes.first(),
        Some(NotificationOutcome::Dropped(ResponseError::Reassembly(
            ReassemblyError::ResponseTooLarge { declared: 5000, .. }
        )))
    ));
    assert!(
        outcomes[1..]
            .iter()
            .all(|outcome| *outcome == NotificationOutcome::Pending)
    );

    let reply = response_wire(Command::ReadVirtualRegister, 0x81, 1, &21.5_f32.to_le_bytes());
    let outcome = last_outcome(deliver(&mut operational, &reply, at(20)));
    assert!(matches!(outcome, NotificationOutcome::Dispatched(_)));
    assert_eq!(operational.sink().values(Metric::Temperature), vec![21.5]);
}
