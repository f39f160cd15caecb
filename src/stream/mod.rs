// ABOUTME: Incremental response stream handling for chat replies
// ABOUTME: Line framing of the event stream and assembly of cumulative message snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Stream Assembler state machine folding fragments into one message
pub mod assembler;
/// Line-buffering parser for `data:` framed event streams
pub mod sse_parser;

pub use assembler::{assemble, parse_fragment, AssemblerState, StreamAssembler};
pub use sse_parser::{SseEvent, SseLineBuffer};
