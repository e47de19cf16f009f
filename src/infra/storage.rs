//! Durable note-collection file with atomic writes.
//!
//! The whole collection lives as one JSON array in a single well-known file.
//! Reads degrade to an empty collection when the file is absent, unreadable,
//! or does not parse; writes are atomic (temp file + rename) so a crashed
//! write never leaves a truncated collection behind.

use crate::domain::Note;
use log::warn;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors during collection file writes.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode note collection: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Creates an appropriate StorageError from an io::Error.
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied { path: path.into() },
            _ => StorageError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Reads the note collection from `path`.
///
/// Never fails: an absent file, an unreadable file, or malformed JSON all
/// yield an empty collection (logged at warn level for the latter two), per
/// the durable-record contract.
pub fn read_collection(path: &Path) -> Vec<Note> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!("could not read {}: {err}; treating as empty", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(notes) => notes,
        Err(err) => {
            warn!(
                "malformed note collection at {}: {err}; treating as empty",
                path.display()
            );
            Vec::new()
        }
    }
}

/// Atomically writes the note collection to `path`.
///
/// Creates parent directories as needed. The collection is written to a
/// temporary file in the same directory and renamed into place.
///
/// # Errors
///
/// Returns `StorageError::PermissionDenied` or `StorageError::Io` when the
/// medium is inaccessible, `StorageError::AtomicWrite` when the final rename
/// fails.
pub fn write_collection(path: &Path, notes: &[Note]) -> Result<(), StorageError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| StorageError::from_io(parent, e))?;

    let json = serde_json::to_string(notes)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| StorageError::from_io(parent, e))?;
    temp.write_all(json.as_bytes())
        .map_err(|e| StorageError::from_io(path, e))?;
    temp.flush().map_err(|e| StorageError::from_io(path, e))?;

    temp.persist(path).map_err(|e| StorageError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;

    Ok(())
}
