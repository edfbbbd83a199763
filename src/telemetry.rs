//! Readings published by the session.
//!
//! Hosts receive values through a [`TelemetrySink`]. Closures taking a
//! `(Metric, f32)` pair are sinks too, which keeps simple hosts and tests
//! free of boilerplate.

use std::fmt;

/// Quantity carried by a published reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Counts per second.
    CountRate,
    /// Counts per minute.
    CountRateCpm,
    /// Dose rate in nanosievert per hour.
    DoseRate,
    /// Accumulated dose in microsievert.
    DoseAccumulated,
    /// Detector temperature in degrees Celsius.
    Temperature,
    /// Device-side accumulated dose register, unfiltered.
    DeviceDose,
}

impl Metric {
    /// Every published quantity.
    pub const ALL: [Self; 6] = [
        Self::CountRate,
        Self::CountRateCpm,
        Self::DoseRate,
        Self::DoseAccumulated,
        Self::Temperature,
        Self::DeviceDose,
    ];

    /// Stable snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CountRate => "count_rate",
            Self::CountRateCpm => "count_rate_cpm",
            Self::DoseRate => "dose_rate",
            Self::DoseAccumulated => "dose_accumulated",
            Self::Temperature => "temperature",
            Self::DeviceDose => "device_dose",
        }
    }

    /// Display unit.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::CountRate => "cps",
            Self::CountRateCpm => "cpm",
            Self::DoseRate => "nSv/h",
            Self::DoseAccumulated => "µSv",
            Self::Temperature => "°C",
            Self::DeviceDose => "µR",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Receiver of published readings.
pub trait TelemetrySink {
    /// Publish one reading.
    fn publish(&mut self, metric: Metric, value: f32);
}

impl<F> TelemetrySink for F
where
    F: FnMut(Metric, f32),
{
    fn publish(&mut self, metric: Metric, value: f32) { self(metric, value); }
}

/// Sink discarding every reading.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn publish(&mut self, _metric: Metric, _value: f32) {}
}
