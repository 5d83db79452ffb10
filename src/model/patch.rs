//! Pending patch model

use std::path::{Path, PathBuf};

/// A whitespace-insensitive diff plus the on-disk snapshot it will replace
///
/// Lives for one drop operation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPatch {
    /// Path relative to the working-tree root
    pub path: PathBuf,
    /// Unified diff text (HEAD -> working file, whitespace ignored)
    pub diff: String,
    /// Full file content before any mutation
    pub snapshot: Vec<u8>,
}

impl PendingPatch {
    pub fn new(path: impl Into<PathBuf>, diff: String, snapshot: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            diff,
            snapshot,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
