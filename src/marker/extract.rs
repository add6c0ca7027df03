//! Reading commit message blocks out of files.

use std::path::Path;

use tracing::debug;

use crate::error::MarkerError;

use super::{find_blocks, read_text};

/// Inner text of every block in `text`, in file order.
pub fn extract_blocks(text: &str) -> Vec<String> {
    find_blocks(text)
        .into_iter()
        .map(|block| block.inner.to_string())
        .collect()
}

/// Read `path` and return the inner text of every block it contains.
///
/// Returns an empty vector when the file has no block or isn't UTF-8 text.
pub fn get_commit_comments(path: &Path) -> Result<Vec<String>, MarkerError> {
    let Some(text) = read_text(path)? else {
        return Ok(Vec::new());
    };

    let comments = extract_blocks(&text);
    debug!("Found {} message block(s) in {}", comments.len(), path.display());
    Ok(comments)
}

/// Split a block's text into its non-empty lines.
pub fn commit_lines(block: &str) -> Vec<&str> {
    block.lines().filter(|line| !line.is_empty()).collect()
}
