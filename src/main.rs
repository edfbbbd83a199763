//! Diagnostic binary for the `radwire` protocol stack.
//!
//! `frame` prints the fragments a request would be written as; `decode`
//! reassembles captured notifications and prints the telemetry they carry.

mod cli;

use std::{num::NonZeroUsize, process::ExitCode};

use clap::Parser;
use radwire::{
    clock::Timestamp,
    command::{CommandError, Request},
    framer::{CommandFramer, FramingError},
    reassembly::{ReassemblyError, ReassemblyState, ResponseReassembler},
    response::{self, DecodeError, DecodedResponse, ResponseBody},
    telemetry::Metric,
};
use thiserror::Error;

use crate::cli::{Action, Cli};

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid hex fragment: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Framing(#[from] FramingError),
    #[error(transparent)]
    Reassembly(#[from] ReassemblyError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("fragment size must be greater than zero")]
    ZeroFragmentSize,
    #[error("response incomplete: received {received} of {expected} bytes")]
    Incomplete { received: usize, expected: u32 },
}

fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let result = match Cli::parse().action {
        Action::Frame {
            request,
            counter,
            fragment_size,
        } => frame(&request, counter, fragment_size),
        Action::Decode { fragments } => decode(&fragments),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("radwire: {err}");
            ExitCode::FAILURE
        }
    }
}

fn frame(request: &str, counter: u8, fragment_size: usize) -> Result<(), CliError> {
    let request: Request = request.parse()?;
    let size = NonZeroUsize::new(fragment_size).ok_or(CliError::ZeroFragmentSize)?;
    let batch = CommandFramer::with_counter(size, counter).frame_request(request)?;
    for fragment in batch.fragments() {
        println!("{}", hex::encode(fragment));
    }
    Ok(())
}

fn decode(fragments: &[String]) -> Result<(), CliError> {
    let mut reassembler = ResponseReassembler::default();
    for fragment in fragments {
        let cleaned: String = fragment
            .chars()
            .filter(|c| c.is_ascii_hexdigit())
            .collect();
        match reassembler.push(&hex::decode(cleaned)?, Timestamp::ZERO) {
            ReassemblyState::Incomplete | ReassemblyState::Discarding { .. } => {}
            ReassemblyState::Rejected(err) => return Err(err.into()),
            ReassemblyState::Complete(complete) => {
                print_response(&response::decode(complete.bytes())?);
                return Ok(());
            }
        }
    }
    let (received, expected) = reassembler
        .buffer()
        .map_or((0, 0), |buffer| (buffer.received(), buffer.expected_size()));
    Err(CliError::Incomplete { received, expected })
}

fn print_response(response: &DecodedResponse) {
    println!(
        "command={} sequence={:#04x} retcode={}",
        response.command,
        response.header.sequence(),
        response.header.retcode()
    );
    match &response.body {
        ResponseBody::Records(parsed) => {
            for record in parsed.records() {
                println!(
                    "record {}: {:.2} {} ({} {}), {:.1} {}",
                    record.header().record_seq,
                    record.count_rate(),
                    Metric::CountRate.unit(),
                    record.count_rate_cpm(),
                    Metric::CountRateCpm.unit(),
                    record.dose_rate_nsv_per_hour(),
                    Metric::DoseRate.unit(),
                );
            }
            println!("skipped={} stop={:?}", parsed.skipped(), parsed.stop());
        }
        ResponseBody::Register(value) => println!("register value={value}"),
        ResponseBody::Empty => println!("empty payload"),
    }
}
