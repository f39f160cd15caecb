// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Terminal rendering sink printing transcripts and streamed replies to stdout
// ABOUTME: Prints only the new suffix of each cumulative stream update

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use seek_chat::models::{ActiveModel, Conversation};
use seek_chat::render::{MessageHandle, RenderSink};

use super::display::{display_conversation, BOT_PREFIX};

#[derive(Debug, Default)]
struct TerminalState {
    conversation_id: Option<String>,
    shown_messages: usize,
    /// A `bot> ` line is open and not yet terminated
    line_open: bool,
    /// Text already printed on the open line
    streamed: String,
    model_selection: Option<bool>,
    active_model: Option<String>,
}

/// Renders to stdout
///
/// A conversation's transcript is printed when it becomes the displayed
/// one; afterwards only new bot messages are printed. User messages are not
/// echoed since the user just typed them.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    state: Mutex<TerminalState>,
    show_history: bool,
}

impl TerminalRenderer {
    /// Renderer for the interactive loop
    pub fn interactive() -> Self {
        Self {
            state: Mutex::default(),
            show_history: true,
        }
    }

    /// Renderer for one-shot sends: no transcript, just the reply
    pub fn reply_only() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, TerminalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_line(state: &mut TerminalState) {
        if !state.line_open {
            print!("{BOT_PREFIX}");
            state.line_open = true;
            state.streamed.clear();
        }
    }

    fn close_line(state: &mut TerminalState) {
        if state.line_open {
            println!();
            state.line_open = false;
            state.streamed.clear();
        }
    }
}

impl RenderSink for TerminalRenderer {
    fn render_conversation(&self, conversation: &Conversation) {
        let mut state = self.state();

        if state.conversation_id.as_deref() != Some(conversation.id.as_str()) {
            Self::close_line(&mut state);
            if self.show_history {
                display_conversation(conversation);
            }
            state.conversation_id = Some(conversation.id.clone());
            state.shown_messages = conversation.messages.len();
            return;
        }

        let already_shown = state.shown_messages.min(conversation.messages.len());
        for message in &conversation.messages[already_shown..] {
            if message.is_user {
                continue;
            }
            if state.line_open && !state.streamed.is_empty() && message.content == state.streamed {
                Self::close_line(&mut state);
                continue;
            }
            if !state.streamed.is_empty() {
                Self::close_line(&mut state);
            }
            Self::open_line(&mut state);
            print!("{}", message.content);
            Self::close_line(&mut state);
        }
        state.shown_messages = conversation.messages.len();
        io::stdout().flush().ok();
    }

    fn render_stream_update(&self, _handle: &MessageHandle, cumulative_text: &str) {
        let mut state = self.state();
        Self::open_line(&mut state);
        match cumulative_text.strip_prefix(state.streamed.as_str()) {
            Some(suffix) => print!("{suffix}"),
            None => print!("\n{BOT_PREFIX}{cumulative_text}"),
        }
        state.streamed = cumulative_text.to_owned();
        io::stdout().flush().ok();
    }

    fn set_loading(&self, loading: bool) {
        let mut state = self.state();
        if loading {
            Self::open_line(&mut state);
            io::stdout().flush().ok();
        } else {
            Self::close_line(&mut state);
        }
    }

    fn set_model_selection_available(&self, available: bool) {
        let mut state = self.state();
        if state.model_selection == Some(available) {
            return;
        }
        state.model_selection = Some(available);
        if !available {
            eprintln!("Not authenticated: model selection disabled. Use /auth to retry.");
        }
    }

    fn render_active_model(&self, model: &ActiveModel) {
        let mut state = self.state();
        if state.active_model.as_deref() == Some(model.id.as_str()) {
            return;
        }
        state.active_model = Some(model.id.clone());
        if self.show_history {
            println!("Model: {}", model.label());
        }
    }
}
