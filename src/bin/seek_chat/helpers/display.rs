// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Output formatting helpers for seek-chat
// ABOUTME: Provides consistent display functions for conversations, transcripts, and models

use chrono::{DateTime, Local};
use seek_chat::models::{ActiveModel, Conversation, ConversationSummary, Message, ModelDescriptor};

/// Prefix of user lines
pub const USER_PREFIX: &str = "you> ";
/// Prefix of bot lines
pub const BOT_PREFIX: &str = "bot> ";

/// Format a millisecond timestamp in local time
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || "-".to_owned(),
        |utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        },
    )
}

/// One transcript line
pub fn format_message(message: &Message) -> String {
    let prefix = if message.is_user {
        USER_PREFIX
    } else {
        BOT_PREFIX
    };
    format!("{prefix}{}", message.content)
}

/// Print a conversation header followed by its full transcript
pub fn display_conversation(conversation: &Conversation) {
    println!("\n== {} ==", conversation.title);
    println!(
        "   {} | {} messages",
        conversation.id,
        conversation.messages.len()
    );
    println!("{}", "-".repeat(60));
    for message in &conversation.messages {
        println!("{}", format_message(message));
    }
}

/// Print the conversation list in the given (display) order
pub fn display_conversation_list(summaries: &[ConversationSummary]) {
    if summaries.is_empty() {
        println!("No conversations yet.");
        return;
    }
    println!("\nConversations:");
    println!("{}", "=".repeat(60));
    for summary in summaries {
        let marker = if summary.is_active { '*' } else { ' ' };
        println!(
            "{marker} {}  {:<33} {:>4} msgs  {}",
            summary.id,
            summary.title,
            summary.message_count,
            format_timestamp(summary.last_activity)
        );
    }
}

/// Print the model catalog, marking the active model
pub fn display_models(models: &[ModelDescriptor], active: &ActiveModel) {
    if models.is_empty() {
        println!("Model catalog unavailable; using {} ({})", active.label(), active.id);
        return;
    }
    println!("\nModels:");
    println!("{}", "=".repeat(60));
    for model in models {
        let marker = if model.id == active.id { '*' } else { ' ' };
        let badge = if model.paid_only { "  [paid]" } else { "" };
        println!(
            "{marker} {:<40} {} {}{badge}",
            model.id, model.display_name, model.version
        );
    }
}

/// Print the REPL command reference
pub fn display_help() {
    println!("Commands:");
    println!("  /new          start a new conversation");
    println!("  /list         list conversations");
    println!("  /open <id>    switch to a conversation");
    println!("  /models       list available models");
    println!("  /model <id>   select a model");
    println!("  /auth         retry authentication");
    println!("  /help         show this help");
    println!("  /quit         exit");
    println!("Anything else is sent as a message.");
}
