//! In-memory [`Link`] shared between a session and the test observing it.

use std::sync::{Arc, Mutex, MutexGuard};

use radwire::link::{Link, LinkError};

#[derive(Debug, Default)]
struct LinkState {
    ready: bool,
    failing: bool,
    writes: Vec<Vec<u8>>,
}

/// Link recording every fragment written through any of its clones.
#[derive(Clone, Debug, Default)]
pub struct RecordingLink {
    state: Arc<Mutex<LinkState>>,
}

impl RecordingLink {
    /// A link whose services are already discovered.
    #[must_use]
    pub fn ready() -> Self {
        let link = Self::default();
        link.set_ready(true);
        link
    }

    fn state(&self) -> MutexGuard<'_, LinkState> { self.state.lock().expect("link state poisoned") }

    /// Mark the command channel as discovered or lost.
    pub fn set_ready(&self, ready: bool) { self.state().ready = ready; }

    /// Make every subsequent write fail.
    pub fn set_failing(&self, failing: bool) { self.state().failing = failing; }

    /// Fragments accepted so far, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<Vec<u8>> { self.state().writes.clone() }

    /// Command codes of accepted fragments that start a packet.
    ///
    /// Assumes every packet fits one fragment, which holds for the fixed
    /// requests at the default fragment size.
    #[must_use]
    pub fn commands(&self) -> Vec<u16> {
        self.writes()
            .iter()
            .filter_map(|w| Some(u16::from_le_bytes([*w.get(4)?, *w.get(5)?])))
            .collect()
    }
}

impl Link for RecordingLink {
    fn write(&mut self, fragment: &[u8]) -> Result<(), LinkError> {
        let mut state = self.state();
        if state.failing {
            return Err(LinkError::Write("injected failure".into()));
        }
        state.writes.push(fragment.to_vec());
        Ok(())
    }

    fn is_services_discovered(&self) -> bool { self.state().ready }
}
