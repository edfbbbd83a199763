//! Command line interface for the `radwire` diagnostic binary.
//!
//! Kept free of crate types so the build script can render the man page
//! from the same definition.

use clap::{Parser, Subcommand};

/// Command line arguments for the `radwire` binary.
#[derive(Debug, Parser)]
#[command(
    name = "radwire",
    version,
    about = "Frame requests and decode responses for a handheld radiation instrument"
)]
pub struct Cli {
    /// Action to perform.
    #[command(subcommand)]
    pub action: Action,
}

/// Diagnostic actions.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Print the link fragments of a request as hex, one per line.
    Frame {
        /// Request to frame: handshake, data, temperature or dose.
        request: String,
        /// Session counter used to derive the sequence byte.
        #[arg(short, long, default_value_t = 0)]
        counter: u8,
        /// Largest fragment the link accepts.
        #[arg(short = 's', long, default_value_t = 18)]
        fragment_size: usize,
    },
    /// Reassemble captured notification fragments and decode the response.
    Decode {
        /// Hex-encoded fragments in arrival order, size prefix included.
        #[arg(required = true)]
        fragments: Vec<String>,
    },
}
