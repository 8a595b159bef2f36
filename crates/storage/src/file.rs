//! File-backed ledger
//!
//! Keeps the whole ledger in memory and persists it as a JSON snapshot.
//! Values are hex-encoded so arbitrary bytes survive the round trip.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::ledger::LedgerStore;
use crate::memory::InMemoryLedger;
use crate::Result;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// Ledger persisted to a single snapshot file
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    inner: InMemoryLedger,
    dirty: bool,
}

impl FileLedger {
    /// Open the snapshot at `path`, starting empty if the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!(path = %path.display(), "Ledger snapshot not found, starting empty");
            return Ok(Self {
                path,
                inner: InMemoryLedger::new(),
                dirty: false,
            });
        }

        let content = fs::read_to_string(&path).map_err(io_error(&path))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", path.display(), e)))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::Corrupt(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut entries = BTreeMap::new();
        for (key, value) in snapshot.entries {
            let bytes = hex::decode(&value)
                .map_err(|e| StorageError::Corrupt(format!("value of {}: {}", key, e)))?;
            entries.insert(key, bytes);
        }

        info!(path = %path.display(), entries = entries.len(), "Ledger snapshot loaded");

        Ok(Self {
            path,
            inner: InMemoryLedger::from_entries(entries),
            dirty: false,
        })
    }

    /// Write the snapshot if anything changed since the last flush
    ///
    /// The file is replaced atomically via a temporary sibling and a rename.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            debug!(path = %self.path.display(), "Ledger unchanged, skipping flush");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
        }

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            entries: self
                .inner
                .entries()
                .iter()
                .map(|(key, value)| (key.clone(), hex::encode(value)))
                .collect(),
        };
        let body = serde_json::to_string_pretty(&snapshot).map_err(|e| {
            StorageError::Serialization {
                key: self.path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(io_error(&self.path))?;

        self.dirty = false;
        info!(path = %self.path.display(), entries = self.inner.len(), "Ledger snapshot written");
        Ok(())
    }

    /// Whether there are writes not yet flushed to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    let path = path.display().to_string();
    move |source| StorageError::Io { path, source }
}

impl LedgerStore for FileLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.dirty = true;
        self.inner.put(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.dirty = true;
        self.inner.delete(key)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        self.inner.scan_prefix(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FileLedger::open(dir.path().join("ledger.json")).unwrap();

        assert!(!ledger.is_dirty());
        assert!(ledger.scan_prefix("").unwrap().is_empty());
    }

    #[test]
    fn test_flush_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.put("account:a", vec![0, 159, 146, 150]).unwrap();
        ledger.put("security:ACME", b"{}".to_vec()).unwrap();
        assert!(ledger.is_dirty());
        ledger.flush().unwrap();
        assert!(!ledger.is_dirty());

        let reopened = FileLedger::open(&path).unwrap();
        assert_eq!(reopened.get("account:a").unwrap(), Some(vec![0, 159, 146, 150]));
        assert!(reopened.exists("security:ACME").unwrap());
    }

    #[test]
    fn test_corrupt_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "not json").unwrap();

        assert_matches!(FileLedger::open(&path), Err(StorageError::Corrupt(_)));
    }
}
