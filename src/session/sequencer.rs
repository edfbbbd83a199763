//! The session coordinator.

use log::{debug, info, warn};

use super::{RequestSchedule, ResponseError, SessionState};
use crate::{
    clock::Timestamp,
    command::{Request, VirtualRegister},
    config::{ConfigError, SessionConfig},
    dose::DoseIntegrator,
    framer::CommandFramer,
    link::{Link, TransmitReport, transmit},
    metrics::{self, ResponseOutcome},
    reassembly::{ReassemblyState, ResponseReassembler, StalledResponse},
    records::RealTimeRecord,
    response::{self, DecodedResponse, ResponseBody},
    telemetry::{Metric, TelemetrySink},
};

/// Result of delivering one notification.
#[derive(Clone, Debug, PartialEq)]
pub enum NotificationOutcome {
    /// The fragment was buffered; the response is not complete yet.
    Pending,
    /// A complete response was decoded and its readings published.
    Dispatched(DecodedResponse),
    /// The fragment or the response it completed was discarded.
    Dropped(ResponseError),
}

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Response discarded because it took too long.
    pub stalled: Option<StalledResponse>,
    /// Requests handed to the link.
    pub issued: Vec<Request>,
}

/// Coordinator owning all state for one instrument connection.
#[derive(Debug)]
pub struct Session<L, S> {
    config: SessionConfig,
    link: L,
    sink: S,
    state: SessionState,
    framer: CommandFramer,
    reassembler: ResponseReassembler,
    schedule: RequestSchedule,
    dose: DoseIntegrator,
    pending_register: Option<VirtualRegister>,
}

impl<L: Link, S: TelemetrySink> Session<L, S> {
    /// Build a disconnected session writing through `link` and publishing
    /// to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails
    /// [`SessionConfig::validate`].
    pub fn new(config: SessionConfig, link: L, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        info!("{config}");
        Ok(Self {
            link,
            sink,
            state: SessionState::Disconnected,
            framer: CommandFramer::new(config.fragment_size),
            reassembler: ResponseReassembler::new(
                config.max_response_size,
                config.response_timeout,
            ),
            schedule: RequestSchedule::new(config.data_interval, config.temperature_interval),
            dose: DoseIntegrator::new(config.dose_report_interval),
            pending_register: None,
            config,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState { self.state }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig { &self.config }

    /// The link has found the instrument's command channel.
    pub fn on_services_discovered(&mut self) { self.transition(SessionState::ServicesDiscovered); }

    /// Notifications are enabled: send the handshake and go operational.
    ///
    /// Ignored unless services were discovered first. Returns the handshake's
    /// transmit report when it was sent.
    pub fn on_subscribed(&mut self, now: Timestamp) -> Option<TransmitReport> {
        if self.state != SessionState::ServicesDiscovered {
            warn!("subscription ignored: state={}", self.state);
            return None;
        }
        self.transition(SessionState::Initializing);
        let report = self.request(Request::Handshake, now);
        self.transition(self.state.after_handshake_sent());
        report
    }

    /// The link dropped. All per-connection state is cleared; the
    /// accumulated dose is kept.
    pub fn on_disconnect(&mut self) {
        self.transition(SessionState::Disconnected);
        self.schedule.clear();
        self.reassembler.reset();
        self.pending_register = None;
    }

    /// Deliver one inbound notification fragment.
    pub fn on_notification(&mut self, fragment: &[u8], now: Timestamp) -> NotificationOutcome {
        if fragment.is_empty() {
            return NotificationOutcome::Pending;
        }
        match self.reassembler.push(fragment, now) {
            ReassemblyState::Incomplete | ReassemblyState::Discarding { .. } => {
                NotificationOutcome::Pending
            }
            ReassemblyState::Rejected(err) => dropped(err.into()),
            ReassemblyState::Complete(response) => {
                if response.slack() > 0 {
                    debug!("response trailing bytes ignored: slack={}", response.slack());
                }
                match self.dispatch(response.bytes(), now) {
                    Ok(decoded) => {
                        metrics::inc_responses(ResponseOutcome::Decoded);
                        NotificationOutcome::Dispatched(decoded)
                    }
                    Err(err) => dropped(err),
                }
            }
        }
    }

    /// Advance time: discard a stalled response and issue due requests.
    pub fn tick(&mut self, now: Timestamp) -> TickOutcome {
        let stalled = self.reassembler.poll_stall(now);
        if let Some(stall) = stalled {
            warn!(
                "response timeout: received={}, expected={}, waited_ms={}",
                stall.received,
                stall.expected_size,
                stall.waited.as_millis()
            );
            metrics::inc_response_timeouts();
        }

        let mut issued = Vec::new();
        if self.state.is_operational() {
            for request in self.schedule.due(now) {
                if self.request(request, now).is_some() {
                    issued.push(request);
                }
            }
        }
        TickOutcome { stalled, issued }
    }

    /// Frame `request` and write it to the link.
    ///
    /// Starts the response-wait clock, discarding any partial response.
    /// Returns `None` without consuming a sequence number when the link is
    /// not ready.
    pub fn request(&mut self, request: Request, now: Timestamp) -> Option<TransmitReport> {
        if !self.link.is_services_discovered() {
            warn!("request dropped: services not discovered, command={}", request.command());
            return None;
        }
        let batch = match self.framer.frame_request(request) {
            Ok(batch) => batch,
            Err(err) => {
                warn!("request dropped: command={}, error={err}", request.command());
                return None;
            }
        };
        self.reassembler.start_wait(now);
        if let Request::Register(register) = request {
            self.pending_register = Some(register);
        }
        debug!(
            "sending request: command={}, sequence={}, fragments={}",
            request.command(),
            batch.sequence(),
            batch.len()
        );
        Some(transmit(&mut self.link, &batch, self.config.write_policy))
    }

    /// Accumulated dose in nanosievert.
    #[must_use]
    pub const fn accumulated_dose(&self) -> f32 { self.dose.accumulated() }

    /// Replace the accumulated dose, e.g. with a value restored by the host.
    pub fn set_accumulated_dose(&mut self, nanosievert: f32) {
        self.dose.set_accumulated(nanosievert);
    }

    /// Zero the accumulated dose.
    pub fn reset_accumulated_dose(&mut self) { self.dose.reset(); }

    /// Borrow the link.
    #[must_use]
    pub const fn link(&self) -> &L { &self.link }

    /// Borrow the link mutably.
    pub fn link_mut(&mut self) -> &mut L { &mut self.link }

    /// Borrow the telemetry sink.
    #[must_use]
    pub const fn sink(&self) -> &S { &self.sink }

    /// Consume the session, returning its link and sink.
    #[must_use]
    pub fn into_parts(self) -> (L, S) { (self.link, self.sink) }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!("session state: from={}, to={next}", self.state);
            self.state = next;
        }
    }

    fn dispatch(&mut self, bytes: &[u8], now: Timestamp) -> Result<DecodedResponse, ResponseError> {
        let decoded = response::decode(bytes)?;
        match &decoded.body {
            ResponseBody::Records(parsed) => {
                for record in parsed.records() {
                    self.publish_realtime(record, now);
                }
            }
            ResponseBody::Register(value) => self.publish_register(*value)?,
            ResponseBody::Empty => {}
        }
        Ok(decoded)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "counts per minute stay far below f32's exact integer range"
    )]
    fn publish_realtime(&mut self, record: &RealTimeRecord, now: Timestamp) {
        let cpm = record.count_rate_cpm();
        let dose_rate = record.dose_rate_nsv_per_hour();
        info!(
            "radiation reading: cps={:.2}, cpm={cpm}, dose_rate_nsv_h={dose_rate:.1}",
            record.count_rate()
        );
        self.sink.publish(Metric::CountRate, record.count_rate());
        self.sink.publish(Metric::CountRateCpm, cpm as f32);
        self.sink.publish(Metric::DoseRate, dose_rate);

        if let Some(accumulated) = self.dose.integrate(dose_rate, now) {
            info!("accumulated dose: usv={accumulated:.3}");
            self.sink.publish(Metric::DoseAccumulated, accumulated);
        }
    }

    fn publish_register(&mut self, value: f32) -> Result<(), ResponseError> {
        let register = self
            .pending_register
            .take()
            .ok_or(ResponseError::UnsolicitedRegister)?;
        match register {
            VirtualRegister::Temperature if !register.accepts(value) => {
                debug!("temperature out of range ignored: value={value}");
            }
            VirtualRegister::Temperature => {
                info!("temperature reading: celsius={value:.1}");
                self.sink.publish(Metric::Temperature, value);
            }
            VirtualRegister::DoseAccumulated => {
                info!("device dose register: value={value}");
                self.sink.publish(Metric::DeviceDose, value);
            }
        }
        Ok(())
    }
}

fn dropped(err: ResponseError) -> NotificationOutcome {
    warn!("response dropped: error={err}");
    metrics::inc_responses(ResponseOutcome::Dropped);
    NotificationOutcome::Dropped(err)
}
