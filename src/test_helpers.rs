#![cfg(test)]
//! Builders for inbound wire data and in-memory collaborators shared by
//! unit tests.

use crate::{
    link::{Link, LinkError},
    telemetry::{Metric, TelemetrySink},
};

// Shared with `radwire_testing`.
#[path = "../radwire_testing/src/wire.rs"]
mod wire;

pub use wire::{realtime_record, record, response_body, response_wire, with_size_prefix};

/// In-memory link recording every fragment written to it.
#[derive(Debug)]
pub struct MemoryLink {
    pub ready: bool,
    pub writes: Vec<Vec<u8>>,
}

impl Default for MemoryLink {
    fn default() -> Self {
        Self {
            ready: true,
            writes: Vec::new(),
        }
    }
}

impl Link for MemoryLink {
    fn write(&mut self, fragment: &[u8]) -> Result<(), LinkError> {
        self.writes.push(fragment.to_vec());
        Ok(())
    }

    fn is_services_discovered(&self) -> bool { self.ready }
}

/// Sink keeping every published reading in order.
#[derive(Debug, Default)]
pub struct ReadingLog(pub Vec<(Metric, f32)>);

impl ReadingLog {
    /// Values published for `metric`, oldest first.
    pub fn values(&self, metric: Metric) -> Vec<f32> {
        self.0
            .iter()
            .filter(|(m, _)| *m == metric)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl TelemetrySink for ReadingLog {
    fn publish(&mut self, metric: Metric, value: f32) { self.0.push((metric, value)); }
}
