// ABOUTME: Integration tests for the file-backed storage slot
// ABOUTME: Covers atomic writes, missing keys, removal, and persistence of the conversation store on disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::sync::Arc;

use seek_chat::storage::{FileStorage, StorageBackend};
use seek_chat::store::ConversationStore;
use tempfile::TempDir;

const KEY: &str = "chatAppConversations_v3";

#[test]
fn test_write_then_read() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    storage.write(KEY, r#"{"conversations":[]}"#).unwrap();
    assert_eq!(
        storage.read(KEY).unwrap().as_deref(),
        Some(r#"{"conversations":[]}"#)
    );
    assert!(dir.path().join(format!("{KEY}.json")).exists());
}

#[test]
fn test_missing_key_reads_none() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join("never-created"));
    assert!(storage.read(KEY).unwrap().is_none());
}

#[test]
fn test_write_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let storage = FileStorage::new(&nested);

    storage.write(KEY, "{}").unwrap();
    assert!(nested.join(format!("{KEY}.json")).is_file());
}

#[test]
fn test_write_leaves_no_temporary_file() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.write(KEY, "first").unwrap();
    storage.write(KEY, "second").unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, [format!("{KEY}.json")]);
    assert_eq!(storage.read(KEY).unwrap().as_deref(), Some("second"));
}

#[test]
fn test_remove() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.write(KEY, "{}").unwrap();

    storage.remove(KEY).unwrap();
    assert!(storage.read(KEY).unwrap().is_none());
    storage.remove(KEY).unwrap();
}

#[test]
fn test_unsafe_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    for key in ["", "../escape", "a/b", ".hidden"] {
        assert!(storage.write(key, "{}").is_err(), "{key:?}");
    }
}

#[test]
fn test_conversation_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let backend: Arc<dyn StorageBackend> = Arc::new(FileStorage::new(dir.path()));

    let (id, session_id) = {
        let mut store = ConversationStore::new(Arc::clone(&backend), KEY);
        let id = store.create().id.clone();
        store.append(&id, "hello from disk", true).unwrap();
        store.append(&id, "hi", false).unwrap();
        let session_id = store.ensure_session_id(&id).unwrap();
        (id, session_id)
    };

    let mut reopened = ConversationStore::new(backend, KEY);
    assert!(reopened.load());
    let conversation = reopened.get(&id).unwrap();
    assert_eq!(conversation.title, "hello from disk");
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.session_id(), Some(session_id.as_str()));
    assert_eq!(reopened.active_id(), Some(id.as_str()));
}
