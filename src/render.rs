// ABOUTME: Rendering sink interface the controller pushes snapshots and stream updates into
// ABOUTME: Keeps the conversation core independent of any particular front end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use seek_chat_core::models::{ActiveModel, Conversation, ConversationSummary};

/// Identifies the in-progress bot message of one request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    /// Conversation the reply belongs to
    pub conversation_id: String,
    /// Request generation that produced the reply
    pub generation: u64,
}

/// Front end receiving state from the controller
///
/// Methods are called with no controller locks held and must not block.
pub trait RenderSink: Send + Sync {
    /// Full redraw of one conversation
    fn render_conversation(&self, conversation: &Conversation);

    /// Replace the in-progress message text with `cumulative_text`
    fn render_stream_update(&self, handle: &MessageHandle, cumulative_text: &str);

    /// Redraw the conversation list (display order)
    fn render_conversation_list(&self, _summaries: &[ConversationSummary]) {}

    /// Show or hide the loading indicator
    fn set_loading(&self, _loading: bool) {}

    /// Enable or disable model selection
    fn set_model_selection_available(&self, _available: bool) {}

    /// Announce the active model
    fn render_active_model(&self, _model: &ActiveModel) {}
}

/// Sink that discards everything (one-shot commands, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn render_conversation(&self, _conversation: &Conversation) {}

    fn render_stream_update(&self, _handle: &MessageHandle, _cumulative_text: &str) {}
}
