// ABOUTME: Core data models shared by the client crate and its binary
// ABOUTME: Conversations, messages, ephemeral credentials, and model catalog entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Conversation and message records (persisted)
pub mod conversation;
/// Ephemeral upstream credential
pub mod credential;
/// Model descriptors and the active selection
pub mod model;

pub use conversation::{derive_title, Conversation, ConversationSummary, Message};
pub use credential::Credential;
pub use model::{ActiveModel, ModelDescriptor};
