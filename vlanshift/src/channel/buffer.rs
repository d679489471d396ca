//! Output buffer with tail-only pattern search.
//!
//! Prompt detection only looks at the last `search_depth` bytes, so a
//! `show running-config` of several hundred kilobytes costs the same to
//! scan as a one-line reply.

use bytes::BytesMut;
use regex::bytes::{Match, Regex};
use vte::{Parser, Perform};

/// Accumulates shell output with terminal escape sequences removed.
pub struct PatternBuffer {
    buffer: BytesMut,
    search_depth: usize,
    parser: Parser,
}

impl PatternBuffer {
    /// Create a buffer that searches the last `search_depth` bytes.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
            parser: Parser::new(),
        }
    }

    /// Append raw channel data.
    ///
    /// The escape parser keeps its state between calls, so a sequence
    /// split across two SSH packets is still removed.
    pub fn extend(&mut self, data: &[u8]) {
        let mut sink = Printable {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut sink, data);
    }

    /// Search the tail of the buffer for `pattern`.
    ///
    /// Offsets in the returned match are relative to the tail, not the
    /// full buffer.
    pub fn search_tail(&self, pattern: &Regex) -> Option<Match<'_>> {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        pattern.find(&self.buffer[start..])
    }

    /// Search the whole buffer.
    pub fn search_full(&self, pattern: &Regex) -> Option<Match<'_>> {
        pattern.find(&self.buffer)
    }

    /// Take the contents, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn search_depth(&self) -> usize {
        self.search_depth
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

/// Keeps printable text and line control, drops escape sequences.
struct Printable<'a> {
    out: &'a mut BytesMut,
}

impl Perform for Printable<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out
            .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.extend_from_slice(&[byte]);
        }
    }
}
