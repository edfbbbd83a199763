//! Metric names and helpers wrapping the [`metrics`](https://docs.rs/metrics)
//! crate.
//!
//! With the `metrics` feature disabled every helper compiles to a no-op and
//! [`MetricsSink`] discards readings.

use crate::telemetry::{Metric, TelemetrySink};

/// Gauge tracking counts per second.
pub const COUNT_RATE_CPS: &str = "radwire_count_rate_cps";
/// Gauge tracking counts per minute.
pub const COUNT_RATE_CPM: &str = "radwire_count_rate_cpm";
/// Gauge tracking dose rate in nSv/h.
pub const DOSE_RATE_NSV_PER_HOUR: &str = "radwire_dose_rate_nsv_per_hour";
/// Gauge tracking accumulated dose in µSv.
pub const DOSE_ACCUMULATED_USV: &str = "radwire_dose_accumulated_usv";
/// Gauge tracking detector temperature.
pub const TEMPERATURE_CELSIUS: &str = "radwire_temperature_celsius";
/// Gauge tracking the device's own accumulated-dose register.
pub const DEVICE_DOSE_UR: &str = "radwire_device_dose_ur";
/// Counter of fragments handed to the link.
pub const FRAGMENTS_SENT: &str = "radwire_fragments_sent_total";
/// Counter of complete responses, labelled by outcome.
pub const RESPONSES_TOTAL: &str = "radwire_responses_total";
/// Counter of responses discarded after the wait timed out.
pub const RESPONSE_TIMEOUTS: &str = "radwire_response_timeouts_total";

/// What happened to a complete response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Decoded and dispatched.
    Decoded,
    /// Discarded.
    Dropped,
}

impl ResponseOutcome {
    #[cfg_attr(
        not(feature = "metrics"),
        expect(dead_code, reason = "only read when recording metrics")
    )]
    const fn as_str(self) -> &'static str {
        match self {
            Self::Decoded => "decoded",
            Self::Dropped => "dropped",
        }
    }
}

/// Gauge name for a published reading.
#[must_use]
pub const fn gauge_name(metric: Metric) -> &'static str {
    match metric {
        Metric::CountRate => COUNT_RATE_CPS,
        Metric::CountRateCpm => COUNT_RATE_CPM,
        Metric::DoseRate => DOSE_RATE_NSV_PER_HOUR,
        Metric::DoseAccumulated => DOSE_ACCUMULATED_USV,
        Metric::Temperature => TEMPERATURE_CELSIUS,
        Metric::DeviceDose => DEVICE_DOSE_UR,
    }
}

/// Record `count` fragments written to the link.
#[cfg(feature = "metrics")]
pub fn inc_fragments_sent(count: u64) { metrics::counter!(FRAGMENTS_SENT).increment(count); }

/// Record `count` fragments written to the link.
#[cfg(not(feature = "metrics"))]
pub fn inc_fragments_sent(_count: u64) {}

/// Record a complete response and its outcome.
#[cfg(feature = "metrics")]
pub fn inc_responses(outcome: ResponseOutcome) {
    metrics::counter!(RESPONSES_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

/// Record a complete response and its outcome.
#[cfg(not(feature = "metrics"))]
pub fn inc_responses(_outcome: ResponseOutcome) {}

/// Record a response discarded after the wait timed out.
#[cfg(feature = "metrics")]
pub fn inc_response_timeouts() { metrics::counter!(RESPONSE_TIMEOUTS).increment(1); }

/// Record a response discarded after the wait timed out.
#[cfg(not(feature = "metrics"))]
pub fn inc_response_timeouts() {}

/// Set the gauge matching `metric`.
#[cfg(feature = "metrics")]
pub fn set_gauge(metric: Metric, value: f32) {
    metrics::gauge!(gauge_name(metric)).set(f64::from(value));
}

/// Set the gauge matching `metric`.
#[cfg(not(feature = "metrics"))]
pub fn set_gauge(_metric: Metric, _value: f32) {}

/// [`TelemetrySink`] exporting readings as gauges.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricsSink;

impl TelemetrySink for MetricsSink {
    fn publish(&mut self, metric: Metric, value: f32) { set_gauge(metric, value); }
}
