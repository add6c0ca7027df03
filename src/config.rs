//! Run configuration built once from the CLI and environment.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable naming the process temp directory.
pub const TMPDIR_ENV_VAR: &str = "TMPDIR";

/// Environment variable that overrides `TMPDIR` for snapshot storage.
pub const OVERRIDE_ENV_VAR: &str = "AUTOGIT_TMPDIR";

/// Fixed subdirectory of the temp directory holding all snapshots.
pub const SNAPSHOT_DIR_NAME: &str = "autogit";

/// Everything the pipeline needs from the process environment.
///
/// Built once at startup and passed down explicitly, so nothing below
/// `main` reads the working directory or environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative input paths are resolved against.
    pub working_dir: PathBuf,
    /// Home directory used for `~/` paths, if known.
    pub home_dir: Option<PathBuf>,
    /// Process temp directory; snapshots go in a subdirectory of it.
    pub temp_dir: PathBuf,
    /// Commit even when no file carries a message block.
    pub allow_empty_message: bool,
}

impl Config {
    /// Build a configuration from the current process environment.
    ///
    /// Fails with [`ConfigError::TempDirNotSet`] when neither `AUTOGIT_TMPDIR`
    /// nor `TMPDIR` is set to a non-empty value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let working_dir = env::current_dir().map_err(ConfigError::WorkingDir)?;
        let temp_dir = [OVERRIDE_ENV_VAR, TMPDIR_ENV_VAR]
            .iter()
            .filter_map(|name| env::var_os(name))
            .find(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::TempDirNotSet)?;
        let home_dir = env::var_os("HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            working_dir,
            home_dir,
            temp_dir,
            allow_empty_message: false,
        })
    }

    /// Directory where snapshot copies are written.
    pub fn snapshot_dir(&self) -> PathBuf {
        self.temp_dir.join(SNAPSHOT_DIR_NAME)
    }
}
