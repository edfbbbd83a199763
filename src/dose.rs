//! Time-weighted integration of dose rate into accumulated dose.
//!
//! [`DoseIntegrator`] keeps a running total in nanosievert. Each call to
//! [`DoseIntegrator::integrate`] adds the area under the rate since the
//! previous call and, at most once per report interval, yields the total in
//! microsievert for publishing. The total is owned by the host for
//! persistence through the get/set/reset accessors.

use std::time::Duration;

use crate::clock::Timestamp;

/// Default minimum spacing between accumulated-dose reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(60);

const SECONDS_PER_HOUR: f64 = 3600.0;
const NANOSIEVERT_PER_MICROSIEVERT: f32 = 1000.0;

/// Running dose integral with throttled reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct DoseIntegrator {
    accumulated: f32,
    last_integration: Option<Timestamp>,
    last_report: Timestamp,
    report_interval: Duration,
}

impl DoseIntegrator {
    /// Create an empty integrator reporting at most once per `report_interval`.
    #[must_use]
    pub const fn new(report_interval: Duration) -> Self {
        Self {
            accumulated: 0.0,
            last_integration: None,
            last_report: Timestamp::ZERO,
            report_interval,
        }
    }

    /// Fold one dose-rate sample (nSv/h) observed at `now` into the total.
    ///
    /// The first sample only starts the clock. Returns the accumulated dose
    /// in microsievert when a report is due.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the accumulator is single precision; the increment is computed in f64"
    )]
    pub fn integrate(&mut self, rate_nsv_per_hour: f32, now: Timestamp) -> Option<f32> {
        let next = match self.last_integration {
            Some(last) => {
                let hours = now.saturating_duration_since(last).as_secs_f64() / SECONDS_PER_HOUR;
                self.accumulated += (f64::from(rate_nsv_per_hour) * hours) as f32;
                last.max(now)
            }
            None => now,
        };
        self.last_integration = Some(next);

        if now.saturating_duration_since(self.last_report) < self.report_interval {
            return None;
        }
        self.last_report = now;
        Some(self.accumulated_usv())
    }

    /// Accumulated dose in nanosievert.
    #[must_use]
    pub const fn accumulated(&self) -> f32 { self.accumulated }

    /// Accumulated dose in microsievert.
    #[must_use]
    pub fn accumulated_usv(&self) -> f32 { self.accumulated / NANOSIEVERT_PER_MICROSIEVERT }

    /// Replace the accumulated dose, e.g. with a persisted value.
    pub fn set_accumulated(&mut self, nanosievert: f32) { self.accumulated = nanosievert; }

    /// Zero the accumulated dose. Integration and report clocks keep running.
    pub fn reset(&mut self) { self.accumulated = 0.0; }

    /// When the last sample was integrated.
    #[must_use]
    pub const fn last_integration(&self) -> Option<Timestamp> { self.last_integration }

    /// When the total was last reported.
    #[must_use]
    pub const fn last_report(&self) -> Timestamp { self.last_report }
}

impl Default for DoseIntegrator {
    fn default() -> Self { Self::new(DEFAULT_REPORT_INTERVAL) }
}
