//! Name-level helpers built on top of [`crate::transliterate`].
//!
//! Document files (`*.md`, any case) keep their extension verbatim; only the
//! stem is rewritten.

use crate::tables;

const MARKDOWN_EXT: &str = ".md";

/// Split a document file name into stem and extension (the extension keeps
/// its leading dot and original case).
///
/// Returns `None` for names that are not documents.
pub fn split_markdown(name: &str) -> Option<(&str, &str)> {
    let split = name.len().checked_sub(MARKDOWN_EXT.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, ext) = name.split_at(split);
    ext.eq_ignore_ascii_case(MARKDOWN_EXT).then_some((stem, ext))
}

/// Returns true if `name` ends in `.md`, ignoring case.
pub fn is_markdown(name: &str) -> bool {
    split_markdown(name).is_some()
}

/// Collapse runs of hyphens into one and trim hyphens from both ends.
pub fn collapse_hyphens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}

/// Transliterate one path segment and tidy its hyphens.
pub fn transliterate_segment(segment: &str) -> String {
    collapse_hyphens(&crate::transliterate(segment))
}

/// Transliterate a file or directory name.
///
/// Document files are transliterated stem-only.
pub fn transliterate_name(name: &str) -> String {
    map_stem(name, transliterate_segment)
}

/// Returns true if no character of `name` is in the deletion or
/// substitution tables.
pub fn is_name_safe(name: &str) -> bool {
    !name.chars().any(tables::is_unsafe)
}

/// Apply the deletion and substitution tables to a name, then tidy hyphens.
///
/// Spaces and non-table characters survive; document files are sanitized
/// stem-only.
pub fn sanitize_name(name: &str) -> String {
    map_stem(name, |stem| collapse_hyphens(&tables::apply_all(stem)))
}

/// Directory name for a space's publish slot.
///
/// Path separators and `:` become hyphens; characters that are illegal on
/// common filesystems are removed.
pub fn space_dir_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '/' | '\\' | ':' => out.push('-'),
            '*' | '?' | '"' | '<' | '>' | '|' => {}
            other => out.push(other),
        }
    }
    out.trim().to_string()
}

/// File stem an exported page is expected to have, derived from its title.
pub fn page_file_stem(title: &str) -> String {
    space_dir_name(title)
}

fn map_stem(name: &str, f: impl Fn(&str) -> String) -> String {
    match split_markdown(name) {
        Some((stem, ext)) => format!("{}{}", f(stem), ext),
        None => f(name),
    }
}
