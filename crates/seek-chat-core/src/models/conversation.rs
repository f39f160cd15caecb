// ABOUTME: Conversation and message records in their persisted JSON shape
// ABOUTME: Title derivation and last-activity ordering helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::conversation::{DEFAULT_TITLE, TITLE_ELLIPSIS, TITLE_MAX_CHARS};

/// A single message in a conversation
///
/// Messages are immutable once appended; their order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message text
    pub content: String,
    /// `true` when authored by the user, `false` for the bot
    pub is_user: bool,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Message {
    /// Create a message
    #[must_use]
    pub fn new(content: impl Into<String>, is_user: bool, timestamp: i64) -> Self {
        Self {
            content: content.into(),
            is_user,
            timestamp,
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_owned()
}

/// A conversation and its full message log
///
/// `id` is the local primary key. `session_id` is the upstream correlation
/// key; it is assigned once and never changes. It is optional only so that
/// records written before session ids existed still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Local unique id
    pub id: String,
    /// Display title
    #[serde(default = "default_title")]
    pub title: String,
    /// Upstream session identifier
    #[serde(
        rename = "apiSessionId",
        alias = "sessionId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
    /// Creation time, milliseconds since the Unix epoch
    pub created_at: i64,
    /// Messages in chronological order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation with the default title
    #[must_use]
    pub fn new(id: impl Into<String>, session_id: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            title: default_title(),
            session_id: Some(session_id.into()),
            created_at,
            messages: Vec::new(),
        }
    }

    /// Timestamp of the last message, or the creation time when empty
    #[must_use]
    pub fn last_activity(&self) -> i64 {
        self.messages
            .last()
            .map_or(self.created_at, |message| message.timestamp)
    }

    /// Session id if one has been assigned and is non-empty
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Listing row for this conversation
    #[must_use]
    pub fn summary(&self, active_id: Option<&str>) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
            last_activity: self.last_activity(),
            is_active: active_id == Some(self.id.as_str()),
        }
    }
}

/// Title for a conversation whose first message is `content`
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and appends
/// [`TITLE_ELLIPSIS`] only when something was cut.
#[must_use]
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let mut title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        title.push_str(TITLE_ELLIPSIS);
    }
    title
}

/// Row of the conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation id
    pub id: String,
    /// Conversation title
    pub title: String,
    /// Number of messages
    pub message_count: usize,
    /// Last activity, milliseconds since the Unix epoch
    pub last_activity: i64,
    /// Whether this is the active conversation
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_short_content_is_unchanged() {
        assert_eq!(derive_title("Hello there"), "Hello there");
    }

    #[test]
    fn test_derive_title_exactly_thirty_chars_has_no_ellipsis() {
        let content = "a".repeat(30);
        assert_eq!(derive_title(&content), content);
    }

    #[test]
    fn test_derive_title_truncates_long_content() {
        let content = "b".repeat(31);
        assert_eq!(derive_title(&content), format!("{}...", "b".repeat(30)));
    }

    #[test]
    fn test_derive_title_counts_characters_not_bytes() {
        let content = "é".repeat(35);
        let title = derive_title(&content);
        assert_eq!(title.chars().count(), 33);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_last_activity_falls_back_to_creation_time() {
        let mut conversation = Conversation::new("c1", "s1", 100);
        assert_eq!(conversation.last_activity(), 100);
        conversation.messages.push(Message::new("hi", true, 250));
        assert_eq!(conversation.last_activity(), 250);
    }

    #[test]
    fn test_persisted_shape_uses_camel_case_fields() {
        let conversation = Conversation::new("c1", "s1", 7);
        let value = serde_json::to_value(&conversation).unwrap();
        assert_eq!(value["apiSessionId"], "s1");
        assert_eq!(value["createdAt"], 7);
        assert!(value["messages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_session_id_deserializes_as_none() {
        let json = r#"{"id":"c1","title":"t","createdAt":1,"messages":[]}"#;
        let conversation: Conversation = serde_json::from_str(json).unwrap();
        assert!(conversation.session_id().is_none());
    }

    #[test]
    fn test_empty_session_id_counts_as_missing() {
        let json = r#"{"id":"c1","title":"t","createdAt":1,"apiSessionId":""}"#;
        let conversation: Conversation = serde_json::from_str(json).unwrap();
        assert!(conversation.session_id().is_none());
    }
}
