//! Display adapter rendering byte slices as a classic hex dump.
//!
//! Used for `trace!` output of inbound payloads; formatting is deferred until
//! the record is actually emitted.

use std::fmt;

const BYTES_PER_LINE: usize = 16;

/// Renders `offset | hex | ascii` lines, sixteen bytes per line.
///
/// ```
/// use radwire::hexdump::HexDump;
///
/// let rendered = HexDump(b"AB\x00").to_string();
/// assert!(rendered.starts_with("0000  41 42 00 "));
/// assert!(rendered.ends_with(" AB."));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, chunk) in self.0.chunks(BYTES_PER_LINE).enumerate() {
            if line > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{:04x} ", line * BYTES_PER_LINE)?;
            for i in 0..BYTES_PER_LINE {
                if i % 8 == 0 {
                    f.write_str(" ")?;
                }
                match chunk.get(i) {
                    Some(byte) => write!(f, "{byte:02x} ")?,
                    None => f.write_str("   ")?,
                }
            }
            f.write_str(" ")?;
            for &byte in chunk {
                let shown = if byte.is_ascii_graphic() || byte == b' ' {
                    char::from(byte)
                } else {
                    '.'
                };
                write!(f, "{shown}")?;
            }
        }
        Ok(())
    }
}
