// ABOUTME: One-shot conversation commands for seek-chat
// ABOUTME: Handles send, list, and show against the persisted conversation log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use anyhow::{anyhow, Result};
use seek_chat::config::ClientConfig;
use seek_chat::controller::{ConversationController, SendOutcome};
use seek_chat::storage::FileStorage;
use seek_chat::store::ConversationStore;
use tracing::info;

use crate::helpers::display::{display_conversation, display_conversation_list};

fn open_store(config: &ClientConfig) -> ConversationStore {
    let backend = Arc::new(FileStorage::new(config.storage.data_dir.clone()));
    let mut store = ConversationStore::new(backend, config.storage.storage_key.clone());
    store.load();
    store
}

/// Send one message in the active conversation (or `conversation_id`) and print the reply
pub async fn send(
    controller: &ConversationController,
    conversation_id: Option<&str>,
    text: &str,
) -> Result<()> {
    controller.initialize().await;
    if let Some(id) = conversation_id {
        controller.open_conversation(id).await;
    }

    match controller.send(text).await {
        SendOutcome::Completed(reply) => {
            info!(reply.chars = reply.chars().count(), "Reply received");
            Ok(())
        }
        SendOutcome::Cancelled => Err(anyhow!("Request was cancelled")),
        SendOutcome::Failed(e) | SendOutcome::Rejected(e) => Err(anyhow!(e)),
    }
}

/// Print the conversation list in display order
pub fn list(config: &ClientConfig) {
    let store = open_store(config);
    display_conversation_list(&store.summaries());
}

/// Print one conversation's transcript
pub fn show(config: &ClientConfig, conversation_id: &str) -> Result<()> {
    let store = open_store(config);
    let conversation = store
        .get(conversation_id)
        .ok_or_else(|| anyhow!("Conversation {conversation_id} not found"))?;
    display_conversation(conversation);
    Ok(())
}
