//! Turning a complete response into typed content.

use bytes::Buf;
use log::{debug, trace};

use super::{DecodeError, ResponseHeader};
use crate::{
    command::Command,
    hexdump::HexDump,
    records::{self, ParsedRecords},
};

/// Typed payload of an accepted response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// Records walked from a data-buffer read.
    Records(ParsedRecords),
    /// Scalar value from a register read.
    Register(f32),
    /// Accepted response without a payload.
    Empty,
}

/// An accepted response and its decoded body.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedResponse {
    /// Parsed response header.
    pub header: ResponseHeader,
    /// Command the response answers.
    pub command: Command,
    /// Decoded payload.
    pub body: ResponseBody,
}

/// Validate and decode a complete response (size prefix already removed).
///
/// # Errors
///
/// Returns [`DecodeError`] if the header is short, the echoed command is not a
/// read command, its return code signals failure, or a register payload is
/// truncated.
pub fn decode(bytes: &[u8]) -> Result<DecodedResponse, DecodeError> {
    let (header, payload) = ResponseHeader::split(bytes)?;
    let command = Command::try_from(header.command_code()).map_err(|_| {
        DecodeError::UnexpectedCommand {
            code: header.command_code(),
        }
    })?;
    if !command.accepts_retcode(header.retcode()) {
        return Err(DecodeError::Rejected {
            command,
            retcode: header.retcode(),
        });
    }
    debug!(
        "response accepted: command={command}, sequence={:#04x}, payload_len={}",
        header.sequence(),
        payload.len()
    );

    let body = if payload.is_empty() {
        ResponseBody::Empty
    } else {
        match command {
            Command::ReadVirtualString => {
                trace!("data buffer payload:\n{}", HexDump(payload));
                ResponseBody::Records(records::parse(payload))
            }
            Command::ReadVirtualRegister => read_register(payload)?,
            Command::SetExchange => ResponseBody::Empty,
        }
    };
    Ok(DecodedResponse {
        header,
        command,
        body,
    })
}

fn read_register(mut payload: &[u8]) -> Result<ResponseBody, DecodeError> {
    if payload.len() < 4 {
        return Err(DecodeError::TruncatedRegister { len: payload.len() });
    }
    Ok(ResponseBody::Register(payload.get_f32_le()))
}
