//! In-file commit message markers.
//!
//! A marker block looks like:
//!
//! ```text
//! /*#COMMIT_MESSAGE
//! Explain the change here.
//! #*/
//! ```
//!
//! Extraction and stripping both go through [`find_blocks`], so a block is
//! either extracted and stripped, or neither.

pub mod extract;
pub mod strip;

use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::error::MarkerError;

pub use extract::{commit_lines, extract_blocks, get_commit_comments};
pub use strip::{delete_commit_comments, strip_blocks};

/// Token opening a commit message block.
pub const START_TOKEN: &str = "/*#COMMIT_MESSAGE";

/// Token closing a commit message block.
pub const END_TOKEN: &str = "#*/";

/// Non-greedy, spans lines, start token must be followed by a line break.
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?s){}\r?\n(.*?){}",
        regex_lite::escape(START_TOKEN),
        regex_lite::escape(END_TOKEN)
    );
    Regex::new(&pattern).expect("Invalid regex")
});

/// A commit message block located in a file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitBlock<'a> {
    /// Byte range of the whole block, start token through end token.
    pub span: Range<usize>,
    /// Text between the start token's line break and the end token.
    pub inner: &'a str,
}

/// Find every commit message block in `text`, in order.
pub fn find_blocks(text: &str) -> Vec<CommitBlock<'_>> {
    BLOCK_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(CommitBlock {
                span: whole.range(),
                inner: inner.as_str(),
            })
        })
        .collect()
}

/// Read `path` as text.
///
/// Returns `None` for content that isn't valid UTF-8 (images, archives and
/// other binary assets). Such a file cannot hold a block and is never rewritten.
pub(crate) fn read_text(path: &Path) -> Result<Option<String>, MarkerError> {
    let bytes = fs::read(path).map_err(|source| MarkerError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            debug!("{} is not UTF-8 text, no blocks", path.display());
            Ok(None)
        }
    }
}
