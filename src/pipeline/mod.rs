//! Commit pipeline: snapshot, aggregate, strip, commit, and recover.
//!
//! Stripping a marker is destructive, so every file is snapshotted before
//! anything is touched. If any step fails the snapshots are written back;
//! snapshots are deleted on every path out of [`CommitPipeline::run`].

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::commit::Committer;
use crate::config::Config;
use crate::error::{PipelineError, SnapshotError, Stage, StepError};
use crate::marker::delete_commit_comments;
use crate::message::get_message;
use crate::paths::FileRef;
use crate::snapshot::{BackupRecord, SnapshotStore};

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
    /// Id of the created commit, `None` for a dry run.
    pub commit_id: Option<String>,
    /// The aggregated commit message.
    pub message: String,
    /// Files that were committed (or would be, for a dry run).
    pub files: Vec<PathBuf>,
}

/// Runs the commit pipeline for one invocation.
pub struct CommitPipeline<C: Committer> {
    config: Config,
    store: SnapshotStore,
    committer: C,
}

impl<C: Committer> CommitPipeline<C> {
    pub fn new(config: Config, committer: C) -> Self {
        let store = SnapshotStore::new(config.snapshot_dir());
        Self {
            config,
            store,
            committer,
        }
    }

    pub fn committer(&self) -> &C {
        &self.committer
    }

    /// Snapshot, strip and commit `files`.
    ///
    /// On failure every file is restored from its snapshot before the error
    /// is returned. Snapshots are always deleted.
    pub fn run(&self, files: &[FileRef]) -> Result<CommitOutcome, PipelineError> {
        self.guarded(files, || self.execute(files))
    }

    /// Snapshot and aggregate only; never strips or commits.
    pub fn dry_run(&self, files: &[FileRef]) -> Result<CommitOutcome, PipelineError> {
        self.guarded(files, || {
            let message = self.aggregate(files)?;
            Ok(CommitOutcome {
                commit_id: None,
                message,
                files: paths_of(files),
            })
        })
    }

    /// Take snapshots, run `body`, restore on failure, clean up always.
    fn guarded<F>(&self, files: &[FileRef], body: F) -> Result<CommitOutcome, PipelineError>
    where
        F: FnOnce() -> Result<CommitOutcome, (Stage, StepError)>,
    {
        let records = match self.store.create_copies(files) {
            Ok(records) => records,
            Err(e) => {
                // Nothing mutated and create_copies already removed its partial copies.
                error!("Snapshot failed: {}", e);
                return Err(PipelineError::Recovered {
                    stage: Stage::Snapshot,
                    source: StepError::Snapshot(e),
                });
            }
        };
        debug!("Took {} snapshot(s) in {}", records.len(), self.store.dir().display());

        let result = match body() {
            Ok(outcome) => Ok(outcome),
            Err((stage, source)) => Err(self.recover(&records, stage, source)),
        };

        if let Err(e) = self.store.delete_copies(&records) {
            warn!("{}", e);
        }

        result
    }

    fn execute(&self, files: &[FileRef]) -> Result<CommitOutcome, (Stage, StepError)> {
        let message = self.aggregate(files)?;

        for file in files {
            delete_commit_comments(&file.path).map_err(|e| (Stage::Strip, StepError::from(e)))?;
        }

        let paths = paths_of(files);
        let commit_id = self
            .committer
            .stage_and_commit(&paths, &message)
            .map_err(|e| (Stage::Commit, StepError::from(e)))?;

        info!("Committed {} file(s) as {}", paths.len(), commit_id);

        Ok(CommitOutcome {
            commit_id: Some(commit_id),
            message,
            files: paths,
        })
    }

    fn aggregate(&self, files: &[FileRef]) -> Result<String, (Stage, StepError)> {
        let message = get_message(files).map_err(|e| (Stage::Aggregate, StepError::from(e)))?;
        if message.is_empty() {
            if !self.config.allow_empty_message {
                return Err((Stage::Aggregate, StepError::EmptyMessage));
            }
            warn!("No commit message block found, committing with an empty message");
        }
        Ok(message)
    }

    /// Write every snapshot back and build the error to report.
    fn recover(&self, records: &[BackupRecord], stage: Stage, source: StepError) -> PipelineError {
        error!("{} failed: {}", stage, source);

        match self.store.restore_copies(records) {
            Ok(restored) => {
                info!("Restored {} file(s) from snapshots", restored);
                PipelineError::Recovered { stage, source }
            }
            Err(SnapshotError::RestoreIncomplete(failed)) => PipelineError::RestoreIncomplete {
                stage,
                source,
                failed,
            },
            Err(other) => {
                error!("Restore failed: {}", other);
                PipelineError::RestoreIncomplete {
                    stage,
                    source,
                    failed: records.iter().map(|r| r.original.clone()).collect(),
                }
            }
        }
    }
}

fn paths_of(files: &[FileRef]) -> Vec<PathBuf> {
    files.iter().map(|f| f.path.clone()).collect()
}
