//! Building the commit message from every file's message blocks.

use tracing::debug;

use crate::error::MarkerError;
use crate::marker::{commit_lines, get_commit_comments};
use crate::paths::FileRef;

/// Render one block as a labeled section.
///
/// Produces:
/// ```text
/// dirA/f1.txt:
/// first line
/// second line
/// ```
/// followed by a trailing newline.
pub fn render_section(label: &str, lines: &[&str]) -> String {
    let mut section = format!("{label}:\n");
    for line in lines {
        section.push_str(line);
        section.push('\n');
    }
    section
}

/// Sections for every block in one file's comments.
pub fn file_sections(file: &FileRef, comments: &[String]) -> Vec<String> {
    let label = file.label();
    comments
        .iter()
        .map(|comment| render_section(&label, &commit_lines(comment)))
        .collect()
}

/// Join sections into the final message.
pub fn join_sections(sections: &[String]) -> String {
    sections.join("\n")
}

/// Build the aggregated commit message for `files`, in input order.
///
/// Files without a block contribute nothing; if no file has one the
/// message is empty.
pub fn get_message(files: &[FileRef]) -> Result<String, MarkerError> {
    let mut sections = Vec::new();
    for file in files {
        let comments = get_commit_comments(&file.path)?;
        if comments.is_empty() {
            debug!("No message block in {}", file.label());
            continue;
        }
        sections.extend(file_sections(file, &comments));
    }

    Ok(join_sections(&sections))
}
