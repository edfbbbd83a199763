//! Connection and initialisation state.

use std::fmt;

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No usable link.
    #[default]
    Disconnected,
    /// The command channel was found; notifications are not yet enabled.
    ServicesDiscovered,
    /// The handshake is being sent.
    Initializing,
    /// Periodic requests are issued on every tick.
    Operational,
}

impl SessionState {
    /// State entered once the handshake has been handed to the link.
    ///
    /// The instrument does not acknowledge the handshake in a way the session
    /// waits for, so an initialising session becomes operational as soon as
    /// the command is sent. Other states are unchanged.
    #[must_use]
    pub const fn after_handshake_sent(self) -> Self {
        match self {
            Self::Initializing => Self::Operational,
            other => other,
        }
    }

    /// Whether periodic requests should be issued.
    #[must_use]
    pub const fn is_operational(self) -> bool { matches!(self, Self::Operational) }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::ServicesDiscovered => "services-discovered",
            Self::Initializing => "initializing",
            Self::Operational => "operational",
        };
        f.write_str(name)
    }
}
