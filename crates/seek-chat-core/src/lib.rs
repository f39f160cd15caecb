// ABOUTME: Core types and constants for the seek-chat conversation client
// ABOUTME: Foundation crate with error handling, conversation models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Seek Chat Core
//!
//! Foundation crate providing shared types and constants for the seek-chat
//! client. It changes rarely and carries no I/O, so the client crate and its
//! binary can share one vocabulary for conversations, credentials and errors.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ErrorDisposition`
//! - **constants**: Protocol constants, defaults, and environment variable names
//! - **models**: Conversations, messages, credentials, and model descriptors

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Conversation, Message, Credential, ModelDescriptor)
pub mod models;
