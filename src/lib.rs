// ABOUTME: Main library entry point for the seek-chat terminal chat client
// ABOUTME: Conversation state, persistence, credential handshake, and streaming reply assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Seek Chat
//!
//! A chat client that keeps its conversation history locally and streams
//! replies from a remote chat service.
//!
//! ## Architecture
//!
//! - **Identity**: credential handshake with a synthetic device identifier
//! - **Session**: upstream session ids correlating the turns of one conversation
//! - **Store**: the durable conversation log and its persistence slot
//! - **Stream**: SSE line framing and cumulative reply assembly
//! - **Controller**: orchestration, in-flight request tracking, and rendering
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use seek_chat::config::ClientConfig;
//! use seek_chat::controller::{ConversationController, SendOutcome};
//! use seek_chat::errors::AppResult;
//! use seek_chat::render::NullRenderer;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ClientConfig::from_env()?;
//!     let controller = ConversationController::from_config(&config, Arc::new(NullRenderer))?;
//!     controller.initialize().await;
//!
//!     if let SendOutcome::Completed(reply) = controller.send("Hello").await {
//!         println!("{reply}");
//!     }
//!     Ok(())
//! }
//! ```

/// Model catalog and active model selection
pub mod catalog;

/// Environment-based client configuration
pub mod config;

/// Conversation orchestration
pub mod controller;

/// Credential acquisition
pub mod identity;

/// Structured logging setup
pub mod logging;

/// Rendering sink interface
pub mod render;

/// Upstream session identifiers
pub mod session;

/// Persistence backends
pub mod storage;

/// Conversation store
pub mod store;

/// Response stream framing and assembly
pub mod stream;

/// HTTP transport to the chat service
pub mod transport;

pub use seek_chat_core::{constants, errors, models};
