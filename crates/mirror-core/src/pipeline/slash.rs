//! Slash-title repair.
//!
//! A page titled `A/B` is exported as `A/B.md` (a directory `A` holding
//! `B.md`). The file is moved to `A-B.md` beside that directory and the
//! emptied chain is pruned.

use std::path::Path;

use mirror_fs::{io::entry_exists, tree};
use mirror_translit::transliterate_segment;
use tracing::debug;

use super::SlashForm;
use super::context::{PassContext, name_of};

pub(crate) fn join_slash_titles(ctx: &mut PassContext<'_>, form: SlashForm) {
    let Some(meta) = ctx.metadata() else { return };

    for title in meta.slash_titles() {
        let segments: Vec<&str> = title
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.len() < 2 {
            continue;
        }

        let original: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
        let transliterated: Vec<String> =
            segments.iter().map(|s| transliterate_segment(s)).collect();

        let variants = match form {
            SlashForm::Original => vec![original],
            SlashForm::Transliterated => vec![transliterated],
            SlashForm::Any if original == transliterated => vec![original],
            SlashForm::Any => vec![original, transliterated],
        };
        for parts in variants {
            if parts.iter().any(String::is_empty) {
                continue;
            }
            join_artifact(ctx, &parts);
        }
    }
}

fn join_artifact(ctx: &mut PassContext<'_>, parts: &[String]) {
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return,
    };
    let joined = format!("{}.md", parts.join("-"));

    let dirs = ctx.listing(tree::dirs(ctx.root));
    for dir in dirs {
        if name_of(&dir) != Some(first.as_str()) || !dir.is_dir() {
            continue;
        }
        let artifact = artifact_path(&dir, rest);
        if !artifact.is_file() {
            continue;
        }
        let Some(parent) = dir.parent() else { continue };
        let merged = parent.join(&joined);
        if entry_exists(&merged) {
            debug!(path = %ctx.rel(&merged).display(), "joined file already present, leaving artifact");
            continue;
        }
        if !ctx.move_into(&artifact, &merged) {
            continue;
        }
        if let Some(chain_end) = artifact.parent() {
            for removed in tree::prune_empty_ancestors(chain_end, ctx.root) {
                ctx.deleted(&removed);
            }
        }
    }
}

// `dir/rest[0]/…/rest[n-1].md`
fn artifact_path(dir: &Path, rest: &[String]) -> std::path::PathBuf {
    let mut path = dir.to_path_buf();
    if let Some((last, middle)) = rest.split_last() {
        for part in middle {
            path.push(part);
        }
        path.push(format!("{last}.md"));
    }
    path
}
