//! autogit - commit files using commit messages embedded in the files themselves.
//!
//! # Overview
//!
//! Each file may carry one or more `/*#COMMIT_MESSAGE ... #*/` blocks. autogit
//! snapshots the files, collects the blocks into a single commit message
//! labeled per file, strips the blocks from the files, and commits exactly
//! those files. If anything fails after a file was touched, every file is
//! restored from its snapshot.

pub mod commit;
pub mod config;
pub mod error;
pub mod marker;
pub mod message;
pub mod paths;
pub mod pipeline;
pub mod snapshot;

// Re-export commonly used types
pub use commit::{Committer, GitCommitter};
pub use config::Config;
pub use error::{
    CommitError, ConfigError, MarkerError, PipelineError, SnapshotError, Stage, StepError,
};
pub use paths::FileRef;
pub use pipeline::{CommitOutcome, CommitPipeline};
pub use snapshot::{BackupRecord, SnapshotStore};
