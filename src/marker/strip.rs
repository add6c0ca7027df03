//! Removing commit message blocks from files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::MarkerError;

use super::{find_blocks, read_text};

/// Remove every block from `text`.
///
/// A block that starts a line also takes the line break right after its end
/// token, so it doesn't leave an empty line behind. Leading blank lines of
/// the result are trimmed. Returns `None` if `text` has no block.
pub fn strip_blocks(text: &str) -> Option<String> {
    let blocks = find_blocks(text);
    if blocks.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for block in &blocks {
        out.push_str(&text[cursor..block.span.start]);

        let mut end = block.span.end;
        let at_line_start = block.span.start == 0 || text[..block.span.start].ends_with('\n');
        if at_line_start {
            let rest = &text[end..];
            if rest.starts_with("\r\n") {
                end += 2;
            } else if rest.starts_with('\n') {
                end += 1;
            }
        }
        cursor = end;
    }
    out.push_str(&text[cursor..]);

    Some(trim_leading_line_breaks(&out).to_string())
}

/// Drop leading `\n` and `\r\n` line breaks. A lone `\r` is content.
fn trim_leading_line_breaks(mut text: &str) -> &str {
    while let Some(rest) = text.strip_prefix('\n').or_else(|| text.strip_prefix("\r\n")) {
        text = rest;
    }
    text
}

/// Strip every block from the file at `path`, rewriting it in place.
///
/// The file is left untouched when it has no block or isn't UTF-8 text.
/// Returns whether the file was rewritten. This is irreversible; take a
/// snapshot first.
pub fn delete_commit_comments(path: &Path) -> Result<bool, MarkerError> {
    let Some(text) = read_text(path)? else {
        return Ok(false);
    };

    let Some(stripped) = strip_blocks(&text) else {
        return Ok(false);
    };

    fs::write(path, stripped).map_err(|source| MarkerError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Stripped message block(s) from {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_surrounded_block() {
        let text = "a\n/*#COMMIT_MESSAGE\nline1\n\nline2\n#*/\nb";
        assert_eq!(strip_blocks(text).unwrap(), "a\nb");
    }

    #[test]
    fn test_strip_block_at_top_trims_leading_blank_lines() {
        let text = "/*#COMMIT_MESSAGE\nmsg\n#*/\n\n\nfn main() {}\n";
        assert_eq!(strip_blocks(text).unwrap(), "fn main() {}\n");
    }

    #[test]
    fn test_strip_keeps_lone_carriage_return() {
        let text = "/*#COMMIT_MESSAGE\nmsg\n#*/\n\r\n\n\rX\n";
        assert_eq!(strip_blocks(text).unwrap(), "\rX\n");
    }

    #[test]
    fn test_strip_no_block() {
        assert!(strip_blocks("fn main() {}\n").is_none());
    }

    #[test]
    fn test_strip_all_blocks() {
        let text = "/*#COMMIT_MESSAGE\none\n#*/\nx\n/*#COMMIT_MESSAGE\ntwo\n#*/\ny\n";
        assert_eq!(strip_blocks(text).unwrap(), "x\ny\n");
    }

    #[test]
    fn test_strip_inline_block_keeps_line_break() {
        let text = "let a = 1; /*#COMMIT_MESSAGE\nmsg\n#*/\nlet b = 2;\n";
        assert_eq!(strip_blocks(text).unwrap(), "let a = 1; \nlet b = 2;\n");
    }

    #[test]
    fn test_strip_crlf() {
        let text = "a\r\n/*#COMMIT_MESSAGE\r\nmsg\r\n#*/\r\nb\r\n";
        assert_eq!(strip_blocks(text).unwrap(), "a\r\nb\r\n");
    }

    #[test]
    fn test_delete_commit_comments_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "a\n/*#COMMIT_MESSAGE\nline1\n#*/\nb").unwrap();

        assert!(delete_commit_comments(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
    }

    #[test]
    fn test_delete_commit_comments_no_block_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "\n\nplain\n").unwrap();

        assert!(!delete_commit_comments(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "\n\nplain\n");
    }

    #[test]
    fn test_delete_commit_comments_binary_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let mut bytes = b"/*#COMMIT_MESSAGE\nmsg\n#*/\n".to_vec();
        bytes.extend_from_slice(&[0xc3, 0x28, 0xff]);
        fs::write(&path, &bytes).unwrap();

        assert!(!delete_commit_comments(&path).unwrap());
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }
}
