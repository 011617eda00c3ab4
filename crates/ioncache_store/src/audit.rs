//! Append-only log of derived cache keys.
//!
//! Every key the pipeline derives is recorded next to the canonical string
//! it was hashed from, one `"<key> | <canonical>"` line per derivation. The
//! log is for auditing only: lines repeat across runs, and a failing log
//! never stops the pipeline.

use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use ioncache_common::CacheKey;
use tracing::warn;

/// Shared handle to the key audit log.
#[derive(Debug)]
pub struct AuditLog {
    path: Option<PathBuf>,
    writer: Mutex<Option<LineWriter<File>>>,
}

impl AuditLog {
    /// Opens `path` for appending, creating it and its parent directory.
    ///
    /// If the file cannot be opened the failure is logged and the returned
    /// log discards records.
    pub fn open(path: &Path) -> Self {
        let opened = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(path));
        let writer = match opened {
            Ok(file) => Some(LineWriter::new(file)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open key audit log");
                None
            }
        };
        Self {
            path: Some(path.to_path_buf()),
            writer: Mutex::new(writer),
        }
    }

    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self {
            path: None,
            writer: Mutex::new(None),
        }
    }

    /// Location of the log file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends one derivation. Write failures are logged and swallowed.
    pub fn record(&self, key: &CacheKey, canonical: &str) {
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(writer) = guard.as_mut() {
            if let Err(e) = writeln!(writer, "{key} | {canonical}") {
                warn!(%key, canonical, error = %e, "failed to write key audit log");
            }
        }
    }
}
