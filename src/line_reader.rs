//! Assembles inbound serial bytes into command lines.

use heapless::String;

use crate::logging::warn;
use crate::shared_constants::COMMAND_LINE_CAPACITY;

/// One complete inbound line, terminator removed.
pub type CommandLine = String<COMMAND_LINE_CAPACITY>;

/// A completed line and whether it had to be cut short.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InboundLine {
    pub text: CommandLine,
    pub truncated: bool,
}

/// Newline framing over a fixed buffer.
///
/// `\r` and non-ASCII bytes are dropped. A line longer than the buffer is cut at
/// capacity and delivered; the rest of it, up to the next `\n`, is discarded.
#[derive(Clone, Debug, Default)]
pub struct LineReader {
    line: CommandLine,
    discarding: bool,
}

impl LineReader {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line: String::new(),
            discarding: false,
        }
    }

    /// Feed one byte; returns a line when this byte completes one.
    pub fn push(&mut self, byte: u8) -> Option<InboundLine> {
        if byte == b'\n' {
            if core::mem::take(&mut self.discarding) {
                return None;
            }
            return Some(InboundLine {
                text: core::mem::take(&mut self.line),
                truncated: false,
            });
        }
        if self.discarding || byte == b'\r' || !byte.is_ascii() {
            return None;
        }
        if self.line.push(char::from(byte)).is_ok() {
            return None;
        }
        self.discarding = true;
        warn!("command line longer than {} bytes was cut", COMMAND_LINE_CAPACITY);
        Some(InboundLine {
            text: core::mem::take(&mut self.line),
            truncated: true,
        })
    }
}
