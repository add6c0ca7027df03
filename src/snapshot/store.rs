//! Snapshot copies in a fixed temp directory.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

use crate::error::SnapshotError;
use crate::paths::FileRef;

use super::record::{BackupRecord, snapshot_key};

/// Directory holding byte-for-byte copies of files about to be rewritten.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy every file into the store.
    ///
    /// - Creates the store directory if it doesn't exist
    /// - Writes each copy atomically under its path digest key
    /// - On any failure, removes the copies made so far and returns the error,
    ///   so a failed call leaves nothing behind
    pub fn create_copies(&self, files: &[FileRef]) -> Result<Vec<BackupRecord>, SnapshotError> {
        fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut records: Vec<BackupRecord> = Vec::with_capacity(files.len());
        for file in files {
            match self.copy_one(file, &records) {
                Ok(record) => records.push(record),
                Err(e) => {
                    if let Err(cleanup) = self.delete_copies(&records) {
                        warn!("Could not remove partial snapshots: {}", cleanup);
                    }
                    return Err(e);
                }
            }
        }

        Ok(records)
    }

    fn copy_one(
        &self,
        file: &FileRef,
        taken: &[BackupRecord],
    ) -> Result<BackupRecord, SnapshotError> {
        let key = snapshot_key(&file.path);
        if taken.iter().any(|r| r.key == key) {
            return Err(SnapshotError::DuplicateKey {
                key,
                path: file.path.clone(),
            });
        }

        let bytes = fs::read(&file.path).map_err(|source| SnapshotError::Read {
            path: file.path.clone(),
            source,
        })?;

        let copy = self.dir.join(&key);
        let write_err = |source| SnapshotError::Write {
            path: copy.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.persist(&copy).map_err(|e| write_err(e.error))?;

        debug!("Snapshot {} -> {}", file.path.display(), copy.display());

        Ok(BackupRecord {
            original: file.path.clone(),
            key,
            copy,
        })
    }

    /// Write every snapshot back over its original file.
    ///
    /// Records whose copy no longer exists are skipped. Every record is
    /// attempted even if an earlier one fails; the originals that could not
    /// be restored are returned in [`SnapshotError::RestoreIncomplete`].
    pub fn restore_copies(&self, records: &[BackupRecord]) -> Result<usize, SnapshotError> {
        let mut restored = 0;
        let mut failed = Vec::new();

        for record in records {
            match restore_one(record) {
                Ok(true) => restored += 1,
                Ok(false) => debug!("No snapshot for {}, skipping", record.original.display()),
                Err(e) => {
                    error!("{}", e);
                    failed.push(record.original.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(restored)
        } else {
            Err(SnapshotError::RestoreIncomplete(failed))
        }
    }

    /// Remove every snapshot copy. Already-missing copies count as removed.
    pub fn delete_copies(&self, records: &[BackupRecord]) -> Result<(), SnapshotError> {
        let mut failed = Vec::new();

        for record in records {
            match fs::remove_file(&record.copy) {
                Ok(()) => debug!("Deleted snapshot {}", record.copy.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    error!(
                        "{}",
                        SnapshotError::Delete {
                            path: record.copy.clone(),
                            source,
                        }
                    );
                    failed.push(record.copy.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(SnapshotError::CleanupIncomplete(failed))
        }
    }
}

/// Restore a single record. Returns `Ok(false)` if the snapshot is gone.
///
/// An original that already matches its snapshot is left alone.
fn restore_one(record: &BackupRecord) -> Result<bool, SnapshotError> {
    let bytes = match fs::read(&record.copy) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(SnapshotError::Restore {
                path: record.original.clone(),
                source,
            });
        }
    };

    if fs::read(&record.original).is_ok_and(|current| current == bytes) {
        return Ok(true);
    }

    fs::write(&record.original, bytes).map_err(|source| SnapshotError::Restore {
        path: record.original.clone(),
        source,
    })?;

    Ok(true)
}
