//! Commits through libgit2.

use std::path::{Path, PathBuf};

use git2::{Commit, ErrorCode, Index, Oid, Repository, Signature};
use tracing::{debug, warn};

use crate::error::CommitError;

use super::Committer;

/// [`Committer`] backed by a git repository on disk.
pub struct GitCommitter {
    repo: Repository,
    workdir: PathBuf,
}

impl GitCommitter {
    /// Open the repository containing `dir`, searching parent directories.
    pub fn discover(dir: &Path) -> Result<Self, CommitError> {
        let repo = Repository::discover(dir).map_err(CommitError::OpenRepository)?;
        Self::from_repository(repo)
    }

    /// Wrap an already-open repository.
    pub fn from_repository(repo: Repository) -> Result<Self, CommitError> {
        let workdir = repo.workdir().ok_or(CommitError::BareRepository)?;
        let workdir = canonical(workdir);
        Ok(Self { repo, workdir })
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Path of `path` relative to the working directory.
    fn relative_path(&self, path: &Path) -> Result<PathBuf, CommitError> {
        canonical(path)
            .strip_prefix(&self.workdir)
            .map(Path::to_path_buf)
            .map_err(|_| CommitError::PathOutsideRepo(path.to_path_buf()))
    }

    /// Resolve HEAD's commit, `None` on an unborn branch.
    fn head_commit(&self) -> Result<Option<Commit<'_>>, CommitError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(CommitError::CommitFailed(e)),
        };

        let commit = head.peel_to_commit().map_err(CommitError::CommitFailed)?;
        Ok(Some(commit))
    }
}

impl Committer for GitCommitter {
    /// Adds each path to the index (like `git add <paths>`), then creates a
    /// commit on HEAD with the given message.
    ///
    /// The index is saved to disk only once the commit exists. On failure the
    /// in-memory index is reloaded, so nothing stays staged.
    fn stage_and_commit(&self, paths: &[PathBuf], message: &str) -> Result<String, CommitError> {
        let relative: Vec<PathBuf> = paths
            .iter()
            .map(|p| self.relative_path(p))
            .collect::<Result<_, _>>()?;

        let sig = self.repo.signature().map_err(CommitError::ConfigError)?;
        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let mut index = self.repo.index().map_err(CommitError::StagingFailed)?;
        let oid = match self.commit_index(&mut index, &relative, message, &sig, &parents) {
            Ok(oid) => oid,
            Err(e) => {
                if let Err(reload) = index.read(true) {
                    warn!("Could not reload the index: {}", reload);
                }
                return Err(e);
            }
        };

        // The commit exists; a stale index is not a reason to roll it back.
        if let Err(e) = index.write() {
            warn!("Commit {} created but the index was not saved: {}", oid, e);
        }

        debug!("Created commit {} with {} file(s)", oid, relative.len());
        Ok(oid.to_string())
    }
}

impl GitCommitter {
    /// Stage `relative` in `index` (in memory only) and commit its tree.
    fn commit_index(
        &self,
        index: &mut Index,
        relative: &[PathBuf],
        message: &str,
        sig: &Signature<'_>,
        parents: &[&Commit<'_>],
    ) -> Result<Oid, CommitError> {
        for path in relative {
            index.add_path(path).map_err(CommitError::StagingFailed)?;
        }

        let tree_id = index.write_tree().map_err(CommitError::StagingFailed)?;
        let tree = self.repo.find_tree(tree_id).map_err(CommitError::CommitFailed)?;

        self.repo
            .commit(Some("HEAD"), sig, sig, message, &tree, parents)
            .map_err(CommitError::CommitFailed)
    }
}

/// Canonicalize if possible so symlinked temp dirs compare equal.
fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
