//! Serialised access to the process-wide `logtest` logger.
//!
//! `logtest` installs one global logger per process. [`LoggerHandle`] holds
//! a lock on it for the lifetime of a test and starts from an empty record
//! queue, so assertions only see what the test itself logged. Tests using
//! it should also be `#[serial]`, since other tests log concurrently.

use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard, OnceLock},
};

use log::Level;
use logtest::Logger;
use rstest::fixture;

/// Exclusive handle to the captured log records.
pub struct LoggerHandle {
    guard: MutexGuard<'static, Logger>,
}

impl LoggerHandle {
    /// Lock the global logger and discard records left by earlier tests.
    pub fn new() -> Self {
        static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| Mutex::new(Logger::start()));
        let guard = logger
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut handle = Self { guard };
        handle.clear();
        handle
    }

    /// Drop every captured record.
    pub fn clear(&mut self) { while self.guard.pop().is_some() {} }

    /// Drain captured records at `level`, returning their messages.
    pub fn messages_at(&mut self, level: Level) -> Vec<String> {
        let mut messages = Vec::new();
        while let Some(record) = self.guard.pop() {
            if record.level() == level {
                messages.push(record.args().to_owned());
            }
        }
        messages
    }

    /// Drain captured warnings, returning their messages.
    pub fn warnings(&mut self) -> Vec<String> { self.messages_at(Level::Warn) }
}

impl Default for LoggerHandle {
    fn default() -> Self { Self::new() }
}

impl Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.guard }
}

impl DerefMut for LoggerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.guard }
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn logger() -> LoggerHandle { LoggerHandle::new() }
