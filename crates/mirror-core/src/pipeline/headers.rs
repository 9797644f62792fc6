//! Metadata-driven transliteration of document paths, plus headers.
//!
//! Every page with a resolved `filePath` has its document moved to the
//! transliterated path and gets a header carrying its title and 1-based
//! position among its siblings. A document already at the transliterated
//! path is overwritten; a directory there leaves the source in place.

use std::path::{Path, PathBuf};

use mirror_content::DocHeader;
use mirror_meta::{PageMeta, safe_blob_path};
use mirror_translit::{split_markdown, transliterate_name};
use tracing::debug;

use super::NormalizationAction;
use super::context::PassContext;

const ATTACHMENTS_DIR: &str = "files";
const ATTACHMENT_LINK: &str = "](files/";

pub(crate) fn transliterate_tree(ctx: &mut PassContext<'_>) {
    let Some(meta) = ctx.metadata() else { return };
    visit(ctx, &meta.pages);
}

fn visit(ctx: &mut PassContext<'_>, pages: &[PageMeta]) {
    for (index, page) in pages.iter().enumerate() {
        if let Some(file_path) = &page.file_path {
            place_document(ctx, page, file_path, index + 1);
        }
        visit(ctx, &page.children);
    }
}

fn place_document(ctx: &mut PassContext<'_>, page: &PageMeta, file_path: &str, position: usize) {
    let Some(rel) = safe_blob_path(file_path) else {
        ctx.warn(format!("ignoring unsafe file path {file_path:?} for page {}", page.id));
        return;
    };
    let source = ctx.root.join(&rel);
    let target = ctx.root.join(transliterate_path(&rel));

    if !source.is_file() {
        if target.is_file() {
            debug!(page = %page.id, "document already transliterated");
        } else {
            ctx.warn(format!("document {} for page {} is missing", rel.display(), page.id));
        }
        return;
    }

    let Some(content) = ctx.read_text(&source) else {
        return;
    };
    let with_header = match DocHeader::new(&page.title, position).apply(&content) {
        Ok(updated) => updated,
        Err(e) => {
            ctx.warn(format!("cannot build header for page {}: {e}", page.id));
            None
        }
    };

    if target == source {
        if let Some(updated) = with_header {
            ctx.rewrite(&source, &updated);
        }
        return;
    }

    if target.is_dir() {
        ctx.warn(format!(
            "{} is a directory, leaving {} in place",
            ctx.rel(&target).display(),
            rel.display()
        ));
        return;
    }
    if target.is_file() {
        ctx.warn(format!(
            "overwriting {} with {}",
            ctx.rel(&target).display(),
            rel.display()
        ));
    }

    let body = with_header.as_deref().unwrap_or(&content);
    if !ctx.write(&target, body) {
        return;
    }
    if let Err(e) = std::fs::remove_file(&source) {
        ctx.warn(format!("cannot remove {}: {e}", rel.display()));
    }
    ctx.record(NormalizationAction::Moved {
        from: rel.clone(),
        to: ctx.rel(&target),
    });
    if with_header.is_some() {
        ctx.record(NormalizationAction::Rewritten {
            path: ctx.rel(&target),
        });
    }

    carry_attachments(ctx, &source, &target, &content);
}

fn carry_attachments(ctx: &mut PassContext<'_>, source: &Path, target: &Path, content: &str) {
    let (Some(from_dir), Some(to_dir)) = (source.parent(), target.parent()) else {
        return;
    };
    if from_dir == to_dir || !content.contains(ATTACHMENT_LINK) {
        return;
    }
    let attachments = from_dir.join(ATTACHMENTS_DIR);
    if attachments.is_dir() {
        ctx.copy_attachments(&attachments, &to_dir.join(ATTACHMENTS_DIR));
    }
}

/// Transliterate each component; components that would become empty keep
/// their original spelling.
fn transliterate_path(rel: &Path) -> PathBuf {
    rel.iter()
        .map(|component| {
            let original = component.to_string_lossy();
            let mapped = transliterate_name(&original);
            let usable = match split_markdown(&mapped) {
                Some((stem, _)) => !stem.is_empty(),
                None => !mapped.is_empty(),
            };
            if usable { mapped } else { original.into_owned() }
        })
        .collect()
}
