//! Periodic request cadence.

use std::time::Duration;

use crate::{
    clock::Timestamp,
    command::{Request, VirtualRegister},
};

/// Tracks when each periodic request class was last issued.
///
/// A class that has never been issued is due immediately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSchedule {
    data_interval: Duration,
    temperature_interval: Duration,
    last_data: Option<Timestamp>,
    last_temperature: Option<Timestamp>,
}

impl RequestSchedule {
    /// Create a schedule with nothing issued yet.
    #[must_use]
    pub const fn new(data_interval: Duration, temperature_interval: Duration) -> Self {
        Self {
            data_interval,
            temperature_interval,
            last_data: None,
            last_temperature: None,
        }
    }

    /// Requests due at `now`, data first. Returned requests count as issued.
    pub fn due(&mut self, now: Timestamp) -> Vec<Request> {
        let mut due = Vec::with_capacity(2);
        if take_if_due(&mut self.last_data, self.data_interval, now) {
            due.push(Request::DataBuffer);
        }
        if take_if_due(&mut self.last_temperature, self.temperature_interval, now) {
            due.push(Request::Register(VirtualRegister::Temperature));
        }
        due
    }

    /// Forget when requests were issued.
    pub fn clear(&mut self) {
        self.last_data = None;
        self.last_temperature = None;
    }

    /// When the last data-buffer read was issued.
    #[must_use]
    pub const fn last_data(&self) -> Option<Timestamp> { self.last_data }

    /// When the last temperature read was issued.
    #[must_use]
    pub const fn last_temperature(&self) -> Option<Timestamp> { self.last_temperature }
}

fn take_if_due(last: &mut Option<Timestamp>, interval: Duration, now: Timestamp) -> bool {
    let due = last.is_none_or(|at| now.saturating_duration_since(at) >= interval);
    if due {
        *last = Some(now);
    }
    due
}
