//! Staging and committing files.

pub mod git;

use std::path::PathBuf;

use crate::error::CommitError;

pub use git::GitCommitter;

/// Stages an exact set of files and records one commit.
///
/// This abstraction allows the pipeline to run without a real repository in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Committer {
    /// Stage exactly `paths` and commit them with `message`.
    ///
    /// Returns the id of the new commit.
    fn stage_and_commit(&self, paths: &[PathBuf], message: &str) -> Result<String, CommitError>;
}
