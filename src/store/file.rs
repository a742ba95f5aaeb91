// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file backend.
//!
//! The whole preference map lives in one JSON document. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous document intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AppError;
use crate::store::KeyValueBackend;

pub struct FileBackend {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileBackend {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                AppError::Storage(format!("corrupt preferences file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Storage(format!("failed to serialize preferences: {}", e)))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| AppError::Storage(format!("failed to write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::Storage(format!("failed to replace {}: {}", self.path.display(), e))
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::Storage("preferences mutex poisoned".to_string()))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        {
            let backend = FileBackend::open(&path).unwrap();
            backend.set("challenge.start_name", "London").unwrap();
            backend.set("account.authenticated", "true").unwrap();
            backend.delete("account.authenticated").unwrap();
        }

        let reopened = FileBackend::open(&path).unwrap();
        assert_eq!(
            reopened.get("challenge.start_name").unwrap().as_deref(),
            Some("London")
        );
        assert_eq!(reopened.get("account.authenticated").unwrap(), None);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("new.json")).unwrap();
        assert_eq!(backend.get("anything").unwrap(), None);
    }

    #[test]
    fn test_delete_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("prefs.json")).unwrap();
        backend.delete("never.set").unwrap();
        assert_eq!(backend.get("never.set").unwrap(), None);
    }
}
