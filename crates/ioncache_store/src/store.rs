//! Filesystem-backed cache entries with a three-state status.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use ioncache_common::{CacheKey, IonRecord};
use tracing::warn;

use crate::artifact::{self, ArtifactHeader};
use crate::error::StoreError;

/// File extension of valid entries.
pub const RESULT_EXT: &str = "result";

/// File extension of invalid-configuration sentinels.
pub const INVALID_EXT: &str = "invalid";

/// Persisted state of one cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// A `.result` file holds the computed records.
    Valid,
    /// A `.invalid` sentinel marks a configuration the engine rejected.
    Invalid,
    /// Nothing has been written yet.
    Absent,
}

/// Cache entries rooted at one directory, with one subdirectory per
/// compound expression.
///
/// Cloning is cheap; every clone addresses the same directory tree.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    tool_version: String,
}

impl CacheStore {
    /// Creates a store rooted at `root`. Nothing is created on disk until
    /// the first write.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// The cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the entries of one compound expression.
    pub fn entry_dir(&self, expression: &str) -> PathBuf {
        self.root.join(expression)
    }

    /// Path of the `.result` file for a key.
    pub fn result_path(&self, expression: &str, key: &CacheKey) -> PathBuf {
        self.entry_dir(expression).join(format!("{key}.{RESULT_EXT}"))
    }

    /// Path of the `.invalid` sentinel for a key.
    pub fn invalid_path(&self, expression: &str, key: &CacheKey) -> PathBuf {
        self.entry_dir(expression).join(format!("{key}.{INVALID_EXT}"))
    }

    /// Creates the entry directory if it does not exist.
    ///
    /// Safe under concurrent callers: an already existing directory is not
    /// an error.
    pub fn ensure_dir(&self, expression: &str) -> Result<PathBuf, StoreError> {
        let dir = self.entry_dir(expression);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(dir)
    }

    /// Probes the persisted state of a key. Read-only.
    ///
    /// A `.result` file wins if both files are somehow present.
    pub fn status(&self, expression: &str, key: &CacheKey) -> EntryStatus {
        if self.result_path(expression, key).is_file() {
            EntryStatus::Valid
        } else if self.invalid_path(expression, key).is_file() {
            EntryStatus::Invalid
        } else {
            EntryStatus::Absent
        }
    }

    /// Persists records as a valid entry.
    ///
    /// The artifact is written to a temporary file in the entry directory
    /// and renamed into place, so an interrupted writer never leaves a
    /// partial `.result`. If encoding or writing fails the key is marked
    /// invalid instead, and the returned status says which state was
    /// persisted.
    pub fn write_valid(
        &self,
        expression: &str,
        key: &CacheKey,
        canonical: &str,
        records: &[IonRecord],
    ) -> Result<EntryStatus, StoreError> {
        match self.try_write_valid(expression, key, canonical, records) {
            Ok(()) => Ok(EntryStatus::Valid),
            Err(e) => {
                warn!(%key, expression, canonical, error = %e, "failed to save ions, marking invalid");
                self.write_invalid(expression, key)?;
                Ok(EntryStatus::Invalid)
            }
        }
    }

    fn try_write_valid(
        &self,
        expression: &str,
        key: &CacheKey,
        canonical: &str,
        records: &[IonRecord],
    ) -> Result<(), StoreError> {
        let bytes = artifact::encode(records, canonical, &self.tool_version)?;
        let dir = self.ensure_dir(expression)?;
        let io_err = |path: &Path, source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(&dir)
            .map_err(|e| io_err(&dir, e))?;
        tmp.write_all(&bytes).map_err(|e| io_err(tmp.path(), e))?;

        let path = self.result_path(expression, key);
        tmp.persist(&path).map_err(|e| io_err(&path, e.error))?;
        Ok(())
    }

    /// Marks a key invalid with an empty sentinel file.
    pub fn write_invalid(&self, expression: &str, key: &CacheKey) -> Result<(), StoreError> {
        self.ensure_dir(expression)?;
        let path = self.invalid_path(expression, key);
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map(drop)
            .map_err(|e| StoreError::Io { path, source: e })
    }

    /// Reads and validates a valid entry.
    ///
    /// Returns `None` for missing, invalid, or corrupt entries.
    pub fn read_entry(
        &self,
        expression: &str,
        key: &CacheKey,
    ) -> Option<(ArtifactHeader, Vec<IonRecord>)> {
        let raw = std::fs::read(self.result_path(expression, key)).ok()?;
        artifact::decode(&raw)
    }

    /// Reads the records of a valid entry.
    pub fn read_records(&self, expression: &str, key: &CacheKey) -> Option<Vec<IonRecord>> {
        self.read_entry(expression, key).map(|(_, records)| records)
    }
}
