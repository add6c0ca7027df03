//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

use autogit::{CommitError, Committer, Config, FileRef};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    /// Stands in for `TMPDIR`.
    pub tmp: tempfile::TempDir,
}

impl TestRepo {
    /// Create a new git repository with a configured identity and one commit.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let tmp = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");

        let test_repo = Self { dir, repo, tmp };
        test_repo.initial_commit();
        test_repo
    }

    fn initial_commit(&self) -> Oid {
        let sig =
            Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let tree_id = self
            .repo
            .index()
            .expect("Failed to get index")
            .write_tree()
            .expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        self.repo
            .commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
            .expect("Failed to create commit")
    }

    /// Configuration rooted at this repository.
    pub fn config(&self) -> Config {
        Config {
            working_dir: self.dir.path().to_path_buf(),
            home_dir: None,
            temp_dir: self.tmp.path().to_path_buf(),
            allow_empty_message: false,
        }
    }

    /// Write a file relative to the repository root and return its reference.
    pub fn write_file(&self, rel: &str, content: &str) -> FileRef {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("path has a parent"))
            .expect("Failed to create parent directory");
        std::fs::write(&path, content).expect("Failed to write test file");
        FileRef::new(path).expect("Failed to build file ref")
    }

    /// Write raw bytes relative to the repository root and return the reference.
    pub fn write_bytes(&self, rel: &str, content: &[u8]) -> FileRef {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("path has a parent"))
            .expect("Failed to create parent directory");
        std::fs::write(&path, content).expect("Failed to write test file");
        FileRef::new(path).expect("Failed to build file ref")
    }

    /// Read a file relative to the repository root.
    pub fn read_file(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(rel)).expect("Failed to read test file")
    }

    /// Message of the commit HEAD points at.
    pub fn head_message(&self) -> String {
        let commit = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD");
        commit.message().unwrap_or_default().to_string()
    }

    /// Content of `rel` in the commit HEAD points at, if tracked.
    pub fn head_blob(&self, rel: &str) -> Option<String> {
        self.head_blob_bytes(rel)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Raw content of `rel` in the commit HEAD points at, if tracked.
    pub fn head_blob_bytes(&self, rel: &str) -> Option<Vec<u8>> {
        let commit = self.repo.head().ok()?.peel_to_commit().ok()?;
        let entry = commit.tree().ok()?.get_path(Path::new(rel)).ok()?;
        let blob = self.repo.find_blob(entry.id()).ok()?;
        Some(blob.content().to_vec())
    }

    /// Content staged for `rel` in the index on disk, if any.
    pub fn staged_blob(&self, rel: &str) -> Option<String> {
        let repo = Repository::open(self.dir.path()).ok()?;
        let entry = repo.index().ok()?.get_path(Path::new(rel), 0)?;
        let blob = repo.find_blob(entry.id).ok()?;
        Some(String::from_utf8_lossy(blob.content()).into_owned())
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        walk.push_head().expect("Failed to push HEAD");
        walk.count()
    }

    /// Number of snapshot files left in the snapshot directory.
    pub fn snapshot_count(&self) -> usize {
        let dir = self.config().snapshot_dir();
        if !dir.exists() {
            return 0;
        }
        std::fs::read_dir(dir)
            .expect("Failed to read snapshot dir")
            .count()
    }
}

/// Committer that records what it was asked to commit and then fails.
#[derive(Default)]
pub struct FailingCommitter {
    /// File contents observed at commit time, in argument order.
    pub seen: RefCell<Vec<String>>,
}

impl Committer for FailingCommitter {
    fn stage_and_commit(&self, paths: &[PathBuf], _message: &str) -> Result<String, CommitError> {
        let mut seen = self.seen.borrow_mut();
        for path in paths {
            seen.push(std::fs::read_to_string(path).unwrap_or_default());
        }
        Err(CommitError::Rejected("pre-commit hook failed".to_string()))
    }
}
