// ABOUTME: SSE (Server-Sent Events) line-buffering parser for chat reply streams
// ABOUTME: Handles partial lines and split UTF-8 sequences across transport chunks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # SSE Stream Parser
//!
//! Transport chunks are not aligned with records. Two cases matter:
//!
//! 1. **Multiple records per chunk**: every complete line in a chunk is
//!    emitted, not just the first.
//!
//! 2. **Records split across chunks**: bytes are buffered until the line
//!    terminator arrives. Buffering raw bytes rather than decoded text means a
//!    multi-byte character split between two chunks is decoded intact.

use std::mem;

use seek_chat_core::constants::stream::{DATA_PREFIX, DONE_MARKER};

/// A parsed SSE event from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload (prefix stripped)
    Data(String),
    /// The `[DONE]` termination marker
    Done,
}

/// Line-buffering SSE parser
///
/// Lines are terminated by `\n` (an optional preceding `\r` is dropped).
/// Lines without the `data:` prefix (`event:`, `id:`, comments, blank
/// separators) produce no event.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    /// Bytes not yet terminated by a newline
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    /// Create a new empty line buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the events of every line completed by them
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.buffer[consumed..].iter().position(|&b| b == b'\n') {
            let line_end = consumed + offset;
            if let Some(event) = parse_line(&self.buffer[consumed..line_end]) {
                events.push(event);
            }
            consumed = line_end + 1;
        }
        self.buffer.drain(..consumed);

        events
    }

    /// Parse whatever remains in the buffer as a final, unterminated line
    ///
    /// Called when the byte stream ends.
    pub fn flush(&mut self) -> Option<SseEvent> {
        let remaining = mem::take(&mut self.buffer);
        parse_line(&remaining)
    }

    /// Whether a partial line is waiting for its terminator
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }
}

fn parse_line(raw: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches('\r');

    let data = line.strip_prefix(DATA_PREFIX)?;
    let data = data.strip_prefix(' ').unwrap_or(data);
    if data.trim().is_empty() {
        return None;
    }
    if data.trim() == DONE_MARKER {
        return Some(SseEvent::Done);
    }
    Some(SseEvent::Data(data.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_events_in_one_chunk() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b"data: {\"content\":\"a\"}\n\ndata: {\"content\":\"b\"}\n");
        assert_eq!(
            events,
            vec![
                SseEvent::Data("{\"content\":\"a\"}".to_owned()),
                SseEvent::Data("{\"content\":\"b\"}".to_owned()),
            ]
        );
    }

    #[test]
    fn test_partial_line_across_chunks() {
        let mut parser = SseLineBuffer::new();
        assert!(parser.feed(b"data: {\"cont").is_empty());
        assert!(parser.has_pending());
        let events = parser.feed(b"ent\":\"x\"}\n");
        assert_eq!(events, vec![SseEvent::Data("{\"content\":\"x\"}".to_owned())]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_split_multibyte_character() {
        let mut parser = SseLineBuffer::new();
        let line = "data: {\"content\":\"é\"}\n".as_bytes();
        let split = line.iter().position(|&b| b == 0xC3).unwrap() + 1;
        assert!(parser.feed(&line[..split]).is_empty());
        let events = parser.feed(&line[split..]);
        assert_eq!(events, vec![SseEvent::Data("{\"content\":\"é\"}".to_owned())]);
    }

    #[test]
    fn test_crlf_and_missing_space() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b"data:{\"content\":\"x\"}\r\n");
        assert_eq!(events, vec![SseEvent::Data("{\"content\":\"x\"}".to_owned())]);
    }

    #[test]
    fn test_done_and_non_data_lines() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b"event: message\nid: 4\n: keepalive\ndata: [DONE]\n");
        assert_eq!(events, vec![SseEvent::Done]);
    }

    #[test]
    fn test_flush_unterminated_line() {
        let mut parser = SseLineBuffer::new();
        assert!(parser.feed(b"data: tail").is_empty());
        assert_eq!(parser.flush(), Some(SseEvent::Data("tail".to_owned())));
        assert_eq!(parser.flush(), None);
    }
}
