//! Flat-file JSON persistence for the file registry
//!
//! The registry is a single JSON array of file records, rewritten wholesale
//! on every mutation. Writes go to a sibling temp file which is then renamed
//! over the target, so a crash mid-write never leaves a corrupt registry.

use pairwise_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::FileRecord;

/// JSON-array backing store for file records
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records; a missing file reads as an empty registry
    pub fn load(&self) -> Result<Vec<FileRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!("corrupt registry {}: {}", self.path.display(), e))
        })
    }

    /// Replace the stored record set atomically (write temp, then rename)
    pub fn save(&self, records: &[FileRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| {
            Error::Storage(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(records = records.len(), path = %self.path.display(), "registry persisted");
        Ok(())
    }
}
