//! Detection of empty "untitled" placeholder pages.

use std::sync::LazyLock;

use regex::Regex;

use crate::header::split_header;

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^untitled( [0-9]+)?\.md$").expect("valid regex"));

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# untitled( \([0-9]+\))?$").expect("valid regex"));

/// `untitled.md` or `untitled N.md`, ignoring case.
pub fn is_placeholder_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// The body (after any header) is exactly a placeholder heading.
pub fn is_placeholder_content(content: &str) -> bool {
    let (_, body) = split_header(content);
    HEADING.is_match(body.trim())
}

pub fn is_placeholder(name: &str, content: &str) -> bool {
    is_placeholder_name(name) && is_placeholder_content(content)
}
