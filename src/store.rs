//! Data-directory plumbing for locally persisted client state.
//!
//! The original client kept its room list and identity in browser local
//! storage; here the analog is a handful of JSON/text files under the
//! platform data directory. Writes go through a temp-file-then-rename so a
//! crash mid-write never leaves a half-written state file behind.

use std::io;
use std::path::{Path, PathBuf};

/// Error for local state file access.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no platform data directory available; set CHARLA_DATA_DIR")]
    NoDataDir,
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("corrupt state file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Locations of the client's persisted state files.
#[derive(Debug, Clone)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    /// Resolve the state root: `CHARLA_DATA_DIR` when set, otherwise the
    /// platform data directory.
    pub fn resolve() -> Result<Self, StoreError> {
        if let Ok(dir) = std::env::var("CHARLA_DATA_DIR") {
            if !dir.trim().is_empty() {
                return Ok(Self::at(PathBuf::from(dir)));
            }
        }
        let base = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::at(base.join("charla")))
    }

    /// Use an explicit state root.
    #[must_use]
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// Saved room list (JSON).
    #[must_use]
    pub fn rooms_file(&self) -> PathBuf {
        self.root.join("rooms.json")
    }

    /// Persisted client identifier (plain text).
    #[must_use]
    pub fn identity_file(&self) -> PathBuf {
        self.root.join("client_id")
    }

    /// Directory where received attachments are saved.
    #[must_use]
    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }
}

/// Read a state file, treating a missing file as absent state.
pub fn read_opt(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Write a state file atomically, creating parent directories as needed.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
