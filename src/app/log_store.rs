// WolPanel - app/log_store.rs
//
// Local persistence of the activity log: a JSON array of `LogEntry` in
// `wol_logs.json` under the platform data directory.
//
// Design principles:
// - Writes are atomic (write temp, rename) so a crash during save never
//   corrupts the previous good store.
// - Malformed or unreadable content is treated as empty history.
// - The store is capped by entry count; the oldest entries go first.

use crate::core::model::LogEntry;
use crate::util::error::StoreError;
use std::path::{Path, PathBuf};

/// File-backed log entry store.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
    max_entries: usize,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Read all stored entries.
    ///
    /// Returns an empty list when the file is missing or malformed. A store
    /// holding more than `max_entries` (e.g. after the cap was lowered) is
    /// trimmed on read.
    pub fn load(&self) -> Vec<LogEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "Cannot read log store");
                }
                return Vec::new();
            }
        };

        let mut entries: Vec<LogEntry> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Log store is malformed, starting with empty history"
                );
                return Vec::new();
            }
        };

        self.trim(&mut entries);
        tracing::debug!(path = %self.path.display(), count = entries.len(), "Log store loaded");
        entries
    }

    /// Drop the oldest entries beyond the cap. Returns how many were dropped.
    pub fn trim(&self, entries: &mut Vec<LogEntry>) -> usize {
        let excess = entries.len().saturating_sub(self.max_entries);
        if excess > 0 {
            entries.drain(..excess);
        }
        excess
    }

    /// Persist `entries` atomically, replacing the previous content.
    pub fn save(&self, entries: &[LogEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                    path: parent.to_path_buf(),
                    operation: "create directory",
                    source: e,
                })?;
            }
        }

        let json = serde_json::to_string(entries).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json.as_bytes()).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            operation: "write",
            source: e,
        })?;

        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            StoreError::Io {
                path: self.path.clone(),
                operation: "rename",
                source: e,
            }
        })?;

        Ok(())
    }

    /// Remove the store file. A missing file is not an error.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io {
                path: self.path.clone(),
                operation: "remove",
                source: e,
            }),
        }
    }
}
