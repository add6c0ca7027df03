//! Error types for autogit modules using thiserror.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from building the run configuration (usage errors).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Usage: autogit <PATH>...")]
    NoPaths,

    #[error("TMPDIR not set")]
    TempDirNotSet,

    #[error("HOME not set, cannot resolve '{0}'")]
    HomeNotSet(String),

    #[error("Failed to determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// Errors from the snapshot store.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to create snapshot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path} for snapshot: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to restore {path} from snapshot: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete snapshot {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot key {key} is shared by more than one file (second: {path})")]
    DuplicateKey { key: String, path: PathBuf },

    #[error("Restore incomplete: {} file(s) could not be restored", .0.len())]
    RestoreIncomplete(Vec<PathBuf>),

    #[error("Cleanup incomplete: {} snapshot(s) could not be deleted", .0.len())]
    CleanupIncomplete(Vec<PathBuf>),
}

/// Errors from reading or rewriting commit message markers in a file.
#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from staging and committing files.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Repository has no working directory (bare repository)")]
    BareRepository,

    #[error("{0} is not inside the repository working directory")]
    PathOutsideRepo(PathBuf),

    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),

    /// For [`Committer`](crate::Committer) implementations other than
    /// `GitCommitter` that decline a commit (a policy check, a hook), with
    /// the reason to show the user.
    #[error("{0}")]
    Rejected(String),
}

/// The pipeline step an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Snapshot,
    Aggregate,
    Strip,
    Commit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Snapshot => write!(f, "snapshot"),
            Stage::Aggregate => write!(f, "message aggregation"),
            Stage::Strip => write!(f, "marker stripping"),
            Stage::Commit => write!(f, "commit"),
        }
    }
}

/// Error produced by a single pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("No commit message block found in any file (use --allow-empty-message to commit anyway)")]
    EmptyMessage,
}

/// Errors from a full pipeline run, after recovery has been attempted.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} failed, original files restored")]
    Recovered {
        stage: Stage,
        #[source]
        source: StepError,
    },

    #[error("{stage} failed and {} file(s) could not be restored", failed.len())]
    RestoreIncomplete {
        stage: Stage,
        #[source]
        source: StepError,
        failed: Vec<PathBuf>,
    },
}

impl PipelineError {
    /// The step that failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Recovered { stage, .. }
            | PipelineError::RestoreIncomplete { stage, .. } => *stage,
        }
    }

    /// The underlying step error.
    pub fn step_error(&self) -> &StepError {
        match self {
            PipelineError::Recovered { source, .. }
            | PipelineError::RestoreIncomplete { source, .. } => source,
        }
    }
}
