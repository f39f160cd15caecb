// ABOUTME: Durable conversation log with best-effort persistence to a storage backend
// ABOUTME: Owns conversation creation, message appends, title derivation, and display ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation Store
//!
//! The whole collection plus the id of the last-active conversation is the
//! unit of persistence. Every mutation persists immediately; persistence
//! failures are logged and never block the caller.

use std::sync::Arc;

use chrono::Utc;
use seek_chat_core::errors::{AppError, AppResult};
use seek_chat_core::models::{derive_title, Conversation, ConversationSummary, Message};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::logging::AppLogger;
use crate::session::SessionRegistry;
use crate::storage::StorageBackend;

/// Serialized form of the collection
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    conversations: Vec<Conversation>,
    #[serde(default)]
    last_active_id: Option<String>,
}

/// Borrowed view used when serializing, so persisting never clones the log
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStateRef<'a> {
    conversations: &'a [Conversation],
    last_active_id: Option<&'a str>,
}

/// In-memory conversation collection backed by a storage slot
pub struct ConversationStore {
    backend: Arc<dyn StorageBackend>,
    storage_key: String,
    conversations: Vec<Conversation>,
    active_id: Option<String>,
}

impl ConversationStore {
    /// Create an empty store bound to `storage_key` on `backend`
    ///
    /// Nothing is read until [`ConversationStore::load`] is called.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>, storage_key: impl Into<String>) -> Self {
        Self {
            backend,
            storage_key: storage_key.into(),
            conversations: Vec::new(),
            active_id: None,
        }
    }

    /// Create a new empty conversation, make it active, and persist
    pub fn create(&mut self) -> &Conversation {
        let conversation = Conversation::new(
            Uuid::new_v4().simple().to_string(),
            SessionRegistry::generate(),
            Utc::now().timestamp_millis(),
        );
        info!(
            conversation.id = %conversation.id,
            session.id = conversation.session_id().unwrap_or_default(),
            "Created conversation"
        );
        self.active_id = Some(conversation.id.clone());
        self.conversations.insert(0, conversation);
        self.persist();
        &self.conversations[0]
    }

    /// Append a message to `conversation_id` and persist
    ///
    /// The first message of a conversation names it when user-authored.
    /// Timestamps never go backwards within one conversation.
    ///
    /// # Errors
    ///
    /// Returns `ConversationNotFound` when the conversation no longer exists;
    /// the store itself is left untouched and recovery is up to the caller
    pub fn append(
        &mut self,
        conversation_id: &str,
        content: impl Into<String>,
        is_user: bool,
    ) -> AppResult<Message> {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == conversation_id)
        else {
            warn!(
                conversation.id = %conversation_id,
                "Append dropped: conversation not found"
            );
            return Err(AppError::conversation_not_found(conversation_id));
        };

        let now = Utc::now().timestamp_millis();
        let timestamp = conversation
            .messages
            .last()
            .map_or(now, |last| now.max(last.timestamp));
        let message = Message::new(content, is_user, timestamp);

        if conversation.messages.is_empty() && is_user {
            conversation.title = derive_title(&message.content);
            debug!(
                conversation.id = %conversation_id,
                title = %conversation.title,
                "Derived conversation title"
            );
        }
        conversation.messages.push(message.clone());

        self.persist();
        Ok(message)
    }

    /// Restore the collection and last-active id from storage
    ///
    /// Returns `true` when valid data was found. Missing or structurally
    /// invalid data leaves the store empty. Conversations lacking a session id
    /// are assigned one here and the result is persisted, so ids are stable
    /// across repeated loads.
    pub fn load(&mut self) -> bool {
        match self.read_state() {
            Ok(Some(state)) => {
                self.conversations = state.conversations;
                self.active_id = state
                    .last_active_id
                    .filter(|id| self.conversations.iter().any(|c| &c.id == id));

                let assigned = SessionRegistry::assign_missing(&mut self.conversations);
                if assigned > 0 {
                    info!(assigned, "Assigned session ids to stored conversations");
                    self.persist();
                }

                info!(
                    conversations = self.conversations.len(),
                    active = self.active_id.as_deref().unwrap_or("none"),
                    "Loaded conversations"
                );
                true
            }
            Ok(None) => {
                debug!(key = %self.storage_key, "No stored conversations");
                self.reset();
                false
            }
            Err(e) => {
                warn!(
                    key = %self.storage_key,
                    error = %e,
                    "Stored conversations unusable, starting empty"
                );
                self.reset();
                false
            }
        }
    }

    fn read_state(&self) -> AppResult<Option<PersistedState>> {
        let Some(raw) = self.backend.read(&self.storage_key)? else {
            return Ok(None);
        };
        let state: PersistedState = serde_json::from_str(&raw).map_err(|e| {
            AppError::storage_corrupt(format!("Stored conversations are not valid: {e}"))
        })?;
        if let Some(bad) = state.conversations.iter().find(|c| c.id.is_empty()) {
            return Err(AppError::storage_corrupt(format!(
                "Stored conversation created at {} has no id",
                bad.created_at
            )));
        }
        Ok(Some(state))
    }

    fn reset(&mut self) {
        self.conversations.clear();
        self.active_id = None;
    }

    /// Serialize the collection to storage, logging any failure
    pub fn persist(&self) {
        if let Err(e) = self.try_persist() {
            AppLogger::log_storage_operation(
                "persist",
                &self.storage_key,
                false,
                Some(&e.to_string()),
            );
        }
    }

    /// Serialize the collection to storage
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails
    pub fn try_persist(&self) -> AppResult<()> {
        let state = PersistedStateRef {
            conversations: &self.conversations,
            last_active_id: self.active_id.as_deref(),
        };
        let serialized = serde_json::to_string(&state)?;
        self.backend.write(&self.storage_key, &serialized)?;
        AppLogger::log_storage_operation("persist", &self.storage_key, true, None);
        Ok(())
    }

    /// Make `conversation_id` active, assign a missing session id, and persist
    ///
    /// # Errors
    ///
    /// Returns `ConversationNotFound` for an unknown id
    pub fn set_active(&mut self, conversation_id: &str) -> AppResult<&Conversation> {
        let index = self
            .position(conversation_id)
            .ok_or_else(|| AppError::conversation_not_found(conversation_id))?;
        SessionRegistry::ensure_session_id(&mut self.conversations[index]);
        self.active_id = Some(conversation_id.to_owned());
        self.persist();
        Ok(&self.conversations[index])
    }

    /// Session id of `conversation_id`, generating and persisting one if absent
    ///
    /// # Errors
    ///
    /// Returns `ConversationNotFound` for an unknown id
    pub fn ensure_session_id(&mut self, conversation_id: &str) -> AppResult<String> {
        let index = self
            .position(conversation_id)
            .ok_or_else(|| AppError::conversation_not_found(conversation_id))?;
        let conversation = &mut self.conversations[index];
        if let Some(existing) = conversation.session_id() {
            return Ok(existing.to_owned());
        }
        let session_id = SessionRegistry::ensure_session_id(conversation);
        self.persist();
        Ok(session_id)
    }

    fn position(&self, conversation_id: &str) -> Option<usize> {
        self.conversations
            .iter()
            .position(|conversation| conversation.id == conversation_id)
    }

    /// Look up a conversation by id
    #[must_use]
    pub fn get(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.id == conversation_id)
    }

    /// The active conversation, if one is set and still exists
    #[must_use]
    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    /// Id of the active conversation
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Conversations in storage order
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Conversations ordered by most recent activity, newest first
    #[must_use]
    pub fn sorted_for_display(&self) -> Vec<&Conversation> {
        let mut sorted: Vec<&Conversation> = self.conversations.iter().collect();
        sorted.sort_by_key(|conversation| std::cmp::Reverse(conversation.last_activity()));
        sorted
    }

    /// Listing rows in display order
    #[must_use]
    pub fn summaries(&self) -> Vec<ConversationSummary> {
        let active_id = self.active_id();
        self.sorted_for_display()
            .into_iter()
            .map(|conversation| conversation.summary(active_id))
            .collect()
    }

    /// Number of conversations
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
