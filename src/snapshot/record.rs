//! Backup records and the keys that name them.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// A snapshot of one file taken before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Absolute path of the file that was copied.
    pub original: PathBuf,
    /// Digest key naming the snapshot inside the store directory.
    pub key: String,
    /// Absolute path of the snapshot copy.
    pub copy: PathBuf,
}

/// Derive the snapshot key for a file path.
///
/// Hex-encoded SHA-256 of the path bytes. Depends only on the path, never on
/// the file contents, so the same file always maps to the same snapshot.
pub fn snapshot_key(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_os_str().as_encoded_bytes());
    hex::encode(hasher.finalize())
}
