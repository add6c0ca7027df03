//! autogit - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autogit::paths::resolve_files;
use autogit::{CommitOutcome, CommitPipeline, Config, ConfigError, GitCommitter};

/// Commit files using the commit message blocks embedded in them.
#[derive(Parser, Debug)]
#[command(name = "autogit")]
#[command(about = "Commit files using the /*#COMMIT_MESSAGE ... #*/ blocks embedded in them")]
#[command(version)]
struct Cli {
    /// Files to commit (absolute, ./relative, '~/home-relative, or relative)
    paths: Vec<String>,

    /// Print the commit message without stripping or committing
    #[arg(long)]
    dry_run: bool,

    /// Commit even if no file contains a message block
    #[arg(long)]
    allow_empty_message: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Step 1: Build configuration (usage errors exit before any side effect)
    if cli.paths.is_empty() {
        return Err(ConfigError::NoPaths.into());
    }
    let mut config = Config::from_env()?;
    config.allow_empty_message = cli.allow_empty_message;

    let files = resolve_files(&cli.paths, &config)?;

    // Step 2: Open the repository containing the working directory
    let committer = GitCommitter::discover(&config.working_dir)
        .context("Not a git repository. Run autogit from within a git repository.")?;

    // Step 3: Run the pipeline
    let pipeline = CommitPipeline::new(config, committer);
    let outcome = if cli.dry_run {
        pipeline.dry_run(&files)?
    } else {
        pipeline.run(&files)?
    };

    print_outcome(&outcome, cli.json)
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`, `debug` with `--verbose`).
fn init_tracing(verbose: bool) {
    let default = if verbose { "autogit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_outcome(outcome: &CommitOutcome, json: bool) -> Result<()> {
    print!("{}", render_outcome(outcome, json)?);
    Ok(())
}

/// Text printed to stdout for a successful run.
fn render_outcome(outcome: &CommitOutcome, json: bool) -> Result<String> {
    if json {
        let rendered =
            serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?;
        return Ok(format!("{}\n", rendered));
    }

    Ok(match &outcome.commit_id {
        Some(id) => {
            let short = id.get(..7).unwrap_or(id);
            format!("✓ Committed {} file(s) as {}\n", outcome.files.len(), short)
        }
        None => format!("--- Dry Run: commit message ---\n\n{}", outcome.message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn outcome(commit_id: Option<&str>) -> CommitOutcome {
        CommitOutcome {
            commit_id: commit_id.map(str::to_string),
            message: "dirA/f1.rs:\nx\n".to_string(),
            files: vec![PathBuf::from("/w/dirA/f1.rs"), PathBuf::from("/w/dirB/f2.rs")],
        }
    }

    #[test]
    fn test_render_commit_summary() {
        let rendered = render_outcome(&outcome(Some("abc1234def5678")), false).unwrap();
        assert_eq!(rendered, "✓ Committed 2 file(s) as abc1234\n");
    }

    #[test]
    fn test_render_dry_run_prints_message() {
        let rendered = render_outcome(&outcome(None), false).unwrap();
        assert_eq!(rendered, "--- Dry Run: commit message ---\n\ndirA/f1.rs:\nx\n");
    }

    #[test]
    fn test_render_json_shape() {
        let rendered = render_outcome(&outcome(Some("abc1234")), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["commit_id"], "abc1234");
        assert_eq!(value["message"], "dirA/f1.rs:\nx\n");
        assert_eq!(value["files"][1], "/w/dirB/f2.rs");
        assert_eq!(value.as_object().unwrap().len(), 3);

        let dry: serde_json::Value =
            serde_json::from_str(&render_outcome(&outcome(None), true).unwrap()).unwrap();
        assert!(dry["commit_id"].is_null());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["autogit", "--dry-run", "--json", "a.rs", "./b.rs"]).unwrap();
        assert!(cli.dry_run && cli.json);
        assert!(!cli.allow_empty_message);
        assert_eq!(cli.paths, vec!["a.rs", "./b.rs"]);
    }

    #[test]
    fn test_no_paths_is_usage_error() {
        let cli = Cli::try_parse_from(["autogit"]).unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.to_string().starts_with("Usage: autogit"));
    }
}
