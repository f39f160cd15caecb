// ABOUTME: Stream Assembler folding incremental content fragments into one growing message
// ABOUTME: Emits cumulative snapshots for progressive rendering and skips malformed records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stream Assembler
//!
//! ```text
//! Idle --begin()--> Streaming --finish()--> Complete
//! ```
//!
//! Every accepted fragment produces the full text so far, never a diff, so a
//! renderer can replace what it shows. The text only ever grows while
//! streaming.

use std::ops::ControlFlow;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use seek_chat_core::errors::{AppError, AppResult};
use serde_json::Value;
use tracing::{trace, warn};

use super::sse_parser::{SseEvent, SseLineBuffer};

/// Assembler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssemblerState {
    /// No request dispatched yet
    #[default]
    Idle,
    /// Accepting transport chunks
    Streaming,
    /// Transport ended; text is final
    Complete,
}

/// Folds one response stream into one message
#[derive(Debug, Default)]
pub struct StreamAssembler {
    state: AssemblerState,
    lines: SseLineBuffer,
    text: String,
    fragments: usize,
    malformed: usize,
}

impl StreamAssembler {
    /// Create an idle assembler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition Idle -> Streaming when the request is dispatched
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the assembler is idle
    pub fn begin(&mut self) -> AppResult<()> {
        if self.state != AssemblerState::Idle {
            return Err(AppError::invalid_state(format!(
                "Cannot begin assembling from {:?}",
                self.state
            )));
        }
        self.state = AssemblerState::Streaming;
        Ok(())
    }

    /// Feed one transport chunk, returning a cumulative snapshot per accepted fragment
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the assembler is streaming
    pub fn feed(&mut self, chunk: &[u8]) -> AppResult<Vec<String>> {
        self.require_streaming()?;
        let events = self.lines.feed(chunk);
        Ok(self.apply(events))
    }

    /// Transition Streaming -> Complete and return the final text
    ///
    /// An unterminated trailing line is still parsed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the assembler is streaming
    pub fn finish(&mut self) -> AppResult<String> {
        self.require_streaming()?;
        let tail = self.lines.flush();
        self.apply(tail);
        self.state = AssemblerState::Complete;
        Ok(self.text.clone())
    }

    fn require_streaming(&self) -> AppResult<()> {
        if self.state == AssemblerState::Streaming {
            Ok(())
        } else {
            Err(AppError::invalid_state(format!(
                "Assembler is {:?}, not streaming",
                self.state
            )))
        }
    }

    fn apply(&mut self, events: impl IntoIterator<Item = SseEvent>) -> Vec<String> {
        let mut snapshots = Vec::new();
        for event in events {
            let SseEvent::Data(payload) = event else {
                trace!("Ignoring stream done marker");
                continue;
            };
            match parse_fragment(&payload) {
                Ok(Some(fragment)) => {
                    self.text.push_str(&fragment);
                    self.fragments += 1;
                    snapshots.push(self.text.clone());
                }
                Ok(None) => {}
                Err(e) => {
                    self.malformed += 1;
                    warn!(error = %e, "Skipping malformed stream record");
                }
            }
        }
        snapshots
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> AssemblerState {
        self.state
    }

    /// Text accumulated so far
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of fragments appended
    #[must_use]
    pub const fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Number of records skipped as malformed
    #[must_use]
    pub const fn malformed_records(&self) -> usize {
        self.malformed
    }
}

/// Extract the content fragment of one `data:` payload
///
/// Returns `Ok(None)` for records carrying no content (missing, null, or
/// empty `content`, or a non-object payload).
///
/// # Errors
///
/// Returns `StreamRecordMalformed` when the payload is not JSON or `content`
/// is not a string
pub fn parse_fragment(payload: &str) -> AppResult<Option<String>> {
    let value: Value = serde_json::from_str(payload).map_err(|e| {
        AppError::stream_record_malformed(format!("Record is not JSON: {e}")).with_source(e)
    })?;
    match value.get("content") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(content)) if content.is_empty() => Ok(None),
        Some(Value::String(content)) => Ok(Some(content.clone())),
        Some(other) => Err(AppError::stream_record_malformed(format!(
            "Record content is not a string: {other}"
        ))),
    }
}

/// Drive `assembler` from `stream` until the transport closes
///
/// `on_update` receives every cumulative snapshot; returning
/// `ControlFlow::Break` stops reading and yields `Ok(None)` without completing
/// the assembler. On normal end of stream the final text is returned.
///
/// # Errors
///
/// Returns the transport error that ended the stream, or `InvalidState` if
/// the assembler was not streaming
pub async fn assemble<S, F>(
    assembler: &mut StreamAssembler,
    mut stream: S,
    mut on_update: F,
) -> AppResult<Option<String>>
where
    S: Stream<Item = AppResult<Bytes>> + Unpin,
    F: FnMut(&str) -> ControlFlow<()>,
{
    while let Some(chunk) = stream.next().await {
        let snapshots = assembler.feed(&chunk?)?;
        for snapshot in &snapshots {
            if on_update(snapshot).is_break() {
                return Ok(None);
            }
        }
    }
    let text = assembler.finish()?;
    Ok(Some(text))
}
