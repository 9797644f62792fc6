//! Placeholder and empty-directory pruning.

use mirror_content::{is_placeholder_content, is_placeholder_name};
use mirror_fs::tree;

use super::context::{PassContext, name_of};

pub(crate) fn prune_placeholders(ctx: &mut PassContext<'_>) {
    let files = ctx.listing(tree::files(ctx.root));
    for path in files {
        let Some(name) = name_of(&path) else { continue };
        if !is_placeholder_name(name) {
            continue;
        }
        let Some(content) = ctx.read_text(&path) else {
            continue;
        };
        if is_placeholder_content(&content) {
            ctx.remove_file(&path);
        }
    }
}

pub(crate) fn prune_empty_dirs(ctx: &mut PassContext<'_>) {
    let removed = ctx.listing(tree::prune_empty_dirs(ctx.root));
    for dir in removed {
        ctx.deleted(&dir);
    }
}
