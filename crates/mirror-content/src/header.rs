//! YAML front-matter headers for exported documents.

use serde::Serialize;

use crate::Result;

const DELIMITER: &str = "---";

/// The header prepended to every document that corresponds to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocHeader {
    pub title: String,
    pub sidebar_position: usize,
}

impl DocHeader {
    /// Header for a page title; a trailing `.md` on the title is dropped.
    pub fn new(title: &str, sidebar_position: usize) -> Self {
        let title = title
            .strip_suffix(".md")
            .unwrap_or(title)
            .to_string();
        Self {
            title,
            sidebar_position,
        }
    }

    /// Render as a delimited block followed by a blank line.
    pub fn render(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n"))
    }

    /// Prepend this header to `content`.
    ///
    /// Returns `None` when the content already starts with a header block,
    /// as recognized by [`split_header`].
    pub fn apply(&self, content: &str) -> Result<Option<String>> {
        if has_header(content) {
            return Ok(None);
        }
        let mut out = self.render()?;
        out.push_str(content);
        Ok(Some(out))
    }
}

/// Returns true if `content` starts with a complete header block.
pub fn has_header(content: &str) -> bool {
    split_header(content).0.is_some()
}

/// Split a leading header block off `content`.
///
/// The header runs from an opening `---` line to the next `---` line,
/// inclusive of that line's newline. Without a complete block the whole
/// content is body.
pub fn split_header(content: &str) -> (Option<&str>, &str) {
    let Some(after_open) = strip_delimiter_line(content) else {
        return (None, content);
    };
    let mut offset = content.len() - after_open.len();
    for line in after_open.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return (Some(&content[..offset]), &content[offset..]);
        }
    }
    (None, content)
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}
