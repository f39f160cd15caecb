// ABOUTME: Persistence slot abstraction for the serialized conversation collection
// ABOUTME: Pluggable backends (file, in-memory) behind a single key/value trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// File-backed storage under the data directory
pub mod file;
/// In-memory storage for tests and ephemeral sessions
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use seek_chat_core::errors::AppResult;

/// Key/value persistence slot
///
/// Values are whole serialized documents; a write replaces the previous value
/// for that key in one step.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, `None` when the slot is empty
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read
    fn read(&self, key: &str) -> AppResult<Option<String>>;

    /// Replace the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the value cannot be written
    fn write(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove the value stored under `key`; removing an empty slot succeeds
    ///
    /// # Errors
    ///
    /// Returns a storage error if the value exists but cannot be removed
    fn remove(&self, key: &str) -> AppResult<()>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
