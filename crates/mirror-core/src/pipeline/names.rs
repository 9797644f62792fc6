//! Name-level repairs for entries the metadata does not describe.

use std::path::Path;

use mirror_fs::io::entry_exists;
use mirror_fs::tree;
use mirror_translit::{
    contains_hangul, is_markdown, is_name_safe, sanitize_name, split_markdown, transliterate_name,
};

use super::context::{PassContext, name_of};

/// Rename original-script documents that were not reached through metadata.
pub(crate) fn transliterate_orphan_files(ctx: &mut PassContext<'_>) {
    let files = ctx.listing(tree::files(ctx.root));
    for path in files {
        let Some(name) = name_of(&path) else { continue };
        if !is_markdown(name) || !contains_hangul(name) {
            continue;
        }
        rename_file(ctx, &path, &transliterate_name(name));
    }
}

/// Apply the deletion and substitution tables to directory and document
/// names, deepest first. Directory conflicts merge; file conflicts are
/// skipped.
pub(crate) fn sanitize_names(ctx: &mut PassContext<'_>) {
    let entries = ctx.listing(tree::entries_deepest_first(ctx.root));
    for path in entries {
        let Some(name) = name_of(&path) else { continue };
        let is_dir = path.is_dir();
        if !(is_dir || path.is_file() && is_markdown(name)) || is_name_safe(name) {
            continue;
        }
        let sanitized = sanitize_name(name);
        if sanitized == name {
            continue;
        }
        if !has_stem(&sanitized) {
            ctx.warn(format!("{} would sanitize to nothing, skipping", ctx.rel(&path).display()));
            continue;
        }
        let Some(parent) = path.parent() else { continue };
        let target = parent.join(&sanitized);

        if is_dir && target.is_dir() {
            ctx.merge(&path, &target);
        } else if entry_exists(&target) {
            ctx.warn(format!(
                "{} already exists, leaving {}",
                ctx.rel(&target).display(),
                ctx.rel(&path).display()
            ));
        } else {
            ctx.rename(&path, &target);
        }
    }
}

/// `name .md` becomes `name.md`; the extension keeps its case.
pub(crate) fn trim_extension_space(ctx: &mut PassContext<'_>) {
    let files = ctx.listing(tree::files(ctx.root));
    for path in files {
        let Some(name) = name_of(&path) else { continue };
        let Some((stem, ext)) = split_markdown(name) else {
            continue;
        };
        let trimmed = stem.trim_end();
        if trimmed == stem || trimmed.is_empty() {
            continue;
        }
        rename_file(ctx, &path, &format!("{trimmed}{ext}"));
    }
}

fn rename_file(ctx: &mut PassContext<'_>, path: &Path, new_name: &str) {
    if !has_stem(new_name) || name_of(path) == Some(new_name) {
        return;
    }
    let Some(parent) = path.parent() else { return };
    let target = parent.join(new_name);
    if entry_exists(&target) {
        ctx.warn(format!(
            "{} already exists, leaving {}",
            ctx.rel(&target).display(),
            ctx.rel(path).display()
        ));
        return;
    }
    ctx.rename(path, &target);
}

fn has_stem(name: &str) -> bool {
    match split_markdown(name) {
        Some((stem, _)) => !stem.is_empty(),
        None => !name.is_empty(),
    }
}
