//! Command codes, request identifiers and fixed request payloads.
//!
//! The instrument exposes a handful of read-style commands. [`Request`] pairs
//! each high-level request the session issues with its [`Command`] code and
//! the four-byte payload the device expects.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// GATT service exposing the instrument's command channel.
pub const SERVICE_UUID: &str = "e63215e5-7003-49d8-96b0-b024798fb901";
/// Characteristic accepting outbound command fragments.
pub const WRITE_CHARACTERISTIC_UUID: &str = "e63215e6-7003-49d8-96b0-b024798fb901";
/// Characteristic delivering inbound response fragments as notifications.
pub const NOTIFY_CHARACTERISTIC_UUID: &str = "e63215e7-7003-49d8-96b0-b024798fb901";

/// Handshake payload sent under [`Command::SetExchange`].
pub const HANDSHAKE_PAYLOAD: [u8; 4] = [0x01, 0xFF, 0x12, 0xFF];

/// Errors raised when parsing command or register identifiers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The numeric command code is not one this crate speaks.
    #[error("unknown command code {0:#06x}")]
    UnknownCode(u16),
    /// The textual request name is not recognised.
    #[error("unknown request `{0}`")]
    UnknownRequest(String),
}

/// Command codes carried in the packet header and echoed in responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Command {
    /// Negotiate exchange parameters; sent once as the session handshake.
    SetExchange = 0x0017,
    /// Read a virtual special-function register (scalar response).
    ReadVirtualRegister = 0x0824,
    /// Read a virtual string (record-stream response).
    ReadVirtualString = 0x0826,
}

impl Command {
    /// Return the on-wire command code.
    #[must_use]
    pub const fn code(self) -> u16 { self as u16 }

    /// Whether `retcode` signals success for this command.
    ///
    /// Virtual string reads succeed only with `1`; register reads accept
    /// either `0` or `1`. The handshake response carries no telemetry and is
    /// never treated as a success.
    #[must_use]
    pub const fn accepts_retcode(self, retcode: u32) -> bool {
        match self {
            Self::ReadVirtualString => retcode == 1,
            Self::ReadVirtualRegister => retcode == 0 || retcode == 1,
            Self::SetExchange => false,
        }
    }
}

impl TryFrom<u16> for Command {
    type Error = CommandError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0x0017 => Ok(Self::SetExchange),
            0x0824 => Ok(Self::ReadVirtualRegister),
            0x0826 => Ok(Self::ReadVirtualString),
            other => Err(CommandError::UnknownCode(other)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SetExchange => "SET_EXCHANGE",
            Self::ReadVirtualRegister => "RD_VIRT_SFR",
            Self::ReadVirtualString => "RD_VIRT_STRING",
        };
        write!(f, "{name}({:#06x})", self.code())
    }
}

/// Virtual string identifiers readable with [`Command::ReadVirtualString`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum VirtualString {
    /// Buffered telemetry records accumulated since the previous read.
    DataBuffer = 256,
}

/// Virtual register identifiers readable with [`Command::ReadVirtualRegister`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum VirtualRegister {
    /// Device-side accumulated dose in microroentgen.
    DoseAccumulated = 0x8022,
    /// Detector temperature in degrees Celsius.
    Temperature = 0x8024,
}

impl VirtualRegister {
    /// Whether `value` is a plausible reading for this register.
    ///
    /// Temperatures outside `(0, 100)` are sensor glitches and are dropped.
    #[must_use]
    pub fn accepts(self, value: f32) -> bool {
        match self {
            Self::Temperature => value > 0.0 && value < 100.0,
            Self::DoseAccumulated => value.is_finite(),
        }
    }
}

/// A request the session can issue to the instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// The one-off exchange-parameter handshake.
    Handshake,
    /// Read the buffered telemetry records.
    DataBuffer,
    /// Read a single virtual register.
    Register(VirtualRegister),
}

impl Request {
    /// Command code carrying this request.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::Handshake => Command::SetExchange,
            Self::DataBuffer => Command::ReadVirtualString,
            Self::Register(_) => Command::ReadVirtualRegister,
        }
    }

    /// Fixed four-byte payload for this request.
    #[must_use]
    pub const fn payload(self) -> [u8; 4] {
        match self {
            Self::Handshake => HANDSHAKE_PAYLOAD,
            Self::DataBuffer => (VirtualString::DataBuffer as u32).to_le_bytes(),
            Self::Register(register) => (register as u32).to_le_bytes(),
        }
    }
}

impl FromStr for Request {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "handshake" => Ok(Self::Handshake),
            "data" | "data-buffer" => Ok(Self::DataBuffer),
            "temperature" => Ok(Self::Register(VirtualRegister::Temperature)),
            "dose" | "dose-accumulated" => Ok(Self::Register(VirtualRegister::DoseAccumulated)),
            other => Err(CommandError::UnknownRequest(other.to_owned())),
        }
    }
}
