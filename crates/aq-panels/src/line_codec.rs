//! Line framing for the flight software's text replies
//!
//! AeroQuad answers commands with comma-separated values terminated by CR/LF.
//! Bytes arrive in arbitrary chunks, so panels push them here and pop whole
//! lines.

use std::collections::VecDeque;

use tracing::debug;

/// Longest line kept before the partial buffer is discarded
pub const MAX_LINE_LENGTH: usize = 1024;

/// Splits a byte stream into text lines
#[derive(Debug, Default)]
pub struct LineCodec {
    buffer: Vec<u8>,
    lines: VecDeque<String>,
}

impl LineCodec {
    /// Create an empty codec
    pub fn new() -> Self {
        Self::default()
    }

    /// Push raw bytes into the codec buffer
    pub fn push_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            match byte {
                b'\r' | b'\n' => {
                    if !self.buffer.is_empty() {
                        let line = String::from_utf8_lossy(&self.buffer).into_owned();
                        self.lines.push_back(line);
                        self.buffer.clear();
                    }
                }
                _ => {
                    if self.buffer.len() >= MAX_LINE_LENGTH {
                        debug!("Discarding {} bytes without line ending", self.buffer.len());
                        self.buffer.clear();
                    }
                    self.buffer.push(byte);
                }
            }
        }
    }

    /// Extract the next complete line, if available
    pub fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    /// Bytes held for a line that is not yet complete
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop buffered bytes and lines
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.lines.clear();
    }
}
