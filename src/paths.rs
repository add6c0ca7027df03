//! Turning command-line path arguments into file references.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::error::ConfigError;

/// A file named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Basename of the file.
    pub name: String,
    /// Name of the immediate containing directory, empty at the filesystem root.
    pub parent: String,
    /// Absolute path to the file.
    pub path: PathBuf,
}

impl FileRef {
    /// Build a reference from an absolute path.
    ///
    /// Returns `None` when the path has no final component (e.g. `/`).
    pub fn new(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let parent = path
            .parent()
            .and_then(Path::file_name)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        Some(Self { name, parent, path })
    }

    /// Label used for this file's section of the commit message.
    pub fn label(&self) -> String {
        format!("{}/{}", self.parent, self.name)
    }
}

/// Resolve a single argument to an absolute path.
///
/// - `/abs/path` is returned unchanged
/// - `./rel` and bare `rel` are joined onto the working directory
/// - `'~/rel` and `~/rel` are joined onto the home directory
pub fn resolve_path(arg: &str, config: &Config) -> Result<PathBuf, ConfigError> {
    if arg.starts_with('/') {
        return Ok(PathBuf::from(arg));
    }

    if let Some(rest) = arg.strip_prefix("./") {
        return Ok(config.working_dir.join(rest));
    }

    if let Some(rest) = arg.strip_prefix("'~/").or_else(|| arg.strip_prefix("~/")) {
        let home = config
            .home_dir
            .as_ref()
            .ok_or_else(|| ConfigError::HomeNotSet(arg.to_string()))?;
        return Ok(home.join(rest));
    }

    Ok(config.working_dir.join(arg))
}

/// Resolve every argument into a [`FileRef`], preserving order.
///
/// Arguments that resolve to the same path are collapsed to the first
/// occurrence; arguments with no file name are skipped. Both cases log a
/// warning.
pub fn resolve_files(args: &[String], config: &Config) -> Result<Vec<FileRef>, ConfigError> {
    if args.is_empty() {
        return Err(ConfigError::NoPaths);
    }

    let mut files: Vec<FileRef> = Vec::with_capacity(args.len());
    for arg in args {
        let path = resolve_path(arg, config)?;
        let Some(file) = FileRef::new(path) else {
            warn!("Skipping '{}': not a file path", arg);
            continue;
        };
        if files.iter().any(|f| f.path == file.path) {
            warn!("Skipping duplicate path {}", file.path.display());
            continue;
        }
        files.push(file);
    }

    if files.is_empty() {
        return Err(ConfigError::NoPaths);
    }

    Ok(files)
}
