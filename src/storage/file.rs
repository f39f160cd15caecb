// ABOUTME: File storage backend writing one JSON document per key in the data directory
// ABOUTME: Writes go to a temporary sibling file and are renamed into place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use seek_chat_core::errors::{AppError, AppResult};
use tracing::debug;

use super::StorageBackend;

/// Stores each key as `<data_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at `data_dir`; the directory is created on first write
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the storage files
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`
    ///
    /// # Errors
    ///
    /// Returns an invalid input error for keys that would escape the data directory
    pub fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
            || key.contains("..")
        {
            return Err(AppError::invalid_input(format!(
                "Storage key '{key}' is not a plain file name"
            )));
        }
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!("Failed to read {}", path.display()))
                .with_source(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            AppError::storage(format!(
                "Failed to create data directory {}",
                self.data_dir.display()
            ))
            .with_source(e)
        })?;

        let tmp_path = self.data_dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp_path, value).map_err(|e| {
            AppError::storage(format!("Failed to write {}", tmp_path.display())).with_source(e)
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            AppError::storage(format!("Failed to replace {}", path.display())).with_source(e)
        })?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage file");
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("Failed to remove {}", path.display()))
                .with_source(e)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_rejects_traversal() {
        let storage = FileStorage::new("/tmp/seek-chat-test");
        assert!(storage.path_for("../etc/passwd").is_err());
        assert!(storage.path_for("a/b").is_err());
        assert!(storage.path_for("").is_err());
        assert!(storage.path_for(".hidden").is_err());
    }

    #[test]
    fn test_path_for_appends_json_extension() {
        let storage = FileStorage::new("/data");
        let path = storage.path_for("chatAppConversations_v3").unwrap();
        assert_eq!(path, PathBuf::from("/data/chatAppConversations_v3.json"));
    }
}
