//! Tokio host loop for a [`Session`].
//!
//! [`SessionDriver`] owns the session and multiplexes three sources in one
//! `tokio::select!` loop: link events from the host's radio stack, a
//! periodic tick and a shutdown token. Timestamps handed to the session are
//! milliseconds since the driver started. One task owns the session, so no
//! locking is involved.

use std::time::Duration;

use bytes::Bytes;
use tokio::{
    sync::mpsc,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Timestamp,
    link::Link,
    session::{NotificationOutcome, Session},
    telemetry::TelemetrySink,
};

/// Default spacing between session ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Events raised by the host's wireless link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// The instrument's command channel was found.
    ServicesDiscovered,
    /// Notifications on the response characteristic are enabled.
    Subscribed,
    /// One inbound notification fragment.
    Notification(Bytes),
    /// The link dropped.
    Disconnected,
}

/// Runs a [`Session`] until shutdown or until the event channel closes.
pub struct SessionDriver<L, S> {
    session: Session<L, S>,
    events: mpsc::Receiver<LinkEvent>,
    shutdown: CancellationToken,
    tick_interval: Duration,
}

impl<L: Link, S: TelemetrySink> SessionDriver<L, S> {
    /// Create a driver ticking every [`DEFAULT_TICK_INTERVAL`].
    #[must_use]
    pub const fn new(
        session: Session<L, S>,
        events: mpsc::Receiver<LinkEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            session,
            events,
            shutdown,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Override the tick spacing. A zero interval is raised to one millisecond.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Drive the session, returning it once the loop ends so the host can
    /// persist the accumulated dose.
    pub async fn run(self) -> Session<L, S> {
        let Self {
            mut session,
            mut events,
            shutdown,
            tick_interval,
        } = self;
        let started = Instant::now();
        let mut ticker = time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => {
                    tracing::debug!("session driver shutting down");
                    break;
                }

                event = events.recv() => match event {
                    Some(event) => handle_event(&mut session, event, elapsed(started)),
                    None => {
                        tracing::debug!("link event channel closed");
                        break;
                    }
                },

                _ = ticker.tick() => {
                    let outcome = session.tick(elapsed(started));
                    if outcome.stalled.is_some() || !outcome.issued.is_empty() {
                        tracing::trace!(issued = ?outcome.issued, stalled = outcome.stalled.is_some(), "session tick");
                    }
                }
            }
        }
        session
    }
}

fn handle_event<L: Link, S: TelemetrySink>(
    session: &mut Session<L, S>,
    event: LinkEvent,
    now: Timestamp,
) {
    match event {
        LinkEvent::ServicesDiscovered => session.on_services_discovered(),
        LinkEvent::Subscribed => {
            if let Some(report) = session.on_subscribed(now) {
                tracing::debug!(sent = report.sent, total = report.total, "handshake written");
            }
        }
        LinkEvent::Notification(fragment) => {
            if let NotificationOutcome::Dispatched(response) = session.on_notification(&fragment, now) {
                tracing::debug!(command = %response.command, "response dispatched");
            }
        }
        LinkEvent::Disconnected => session.on_disconnect(),
    }
    tracing::trace!(state = %session.state(), %now, "link event handled");
}

fn elapsed(started: Instant) -> Timestamp {
    Timestamp::from_millis(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
}
