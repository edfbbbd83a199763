//! In-memory [`TelemetrySink`].

use std::sync::{Arc, Mutex};

use radwire::telemetry::{Metric, TelemetrySink};

/// Sink recording readings published through any of its clones.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    readings: Arc<Mutex<Vec<(Metric, f32)>>>,
}

impl RecordingSink {
    /// Every reading, oldest first.
    #[must_use]
    pub fn readings(&self) -> Vec<(Metric, f32)> {
        self.readings.lock().expect("sink poisoned").clone()
    }

    /// Values published for `metric`, oldest first.
    #[must_use]
    pub fn values(&self, metric: Metric) -> Vec<f32> {
        self.readings()
            .into_iter()
            .filter(|(m, _)| *m == metric)
            .map(|(_, v)| v)
            .collect()
    }
}

impl TelemetrySink for RecordingSink {
    fn publish(&mut self, metric: Metric, value: f32) {
        self.readings
            .lock()
            .expect("sink poisoned")
            .push((metric, value));
    }
}
