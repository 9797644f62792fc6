//! Literal escaping of document bodies.

use mirror_content::{escape_block_hazards, escape_inline_hazards};
use mirror_fs::tree;
use mirror_translit::is_markdown;

use super::context::{PassContext, name_of};

pub(crate) fn escape_inline(ctx: &mut PassContext<'_>) {
    rewrite_documents(ctx, escape_inline_hazards);
}

pub(crate) fn escape_blocks(ctx: &mut PassContext<'_>) {
    rewrite_documents(ctx, escape_block_hazards);
}

fn rewrite_documents(ctx: &mut PassContext<'_>, f: fn(&str) -> String) {
    let files = ctx.listing(tree::files(ctx.root));
    for path in files {
        if !name_of(&path).is_some_and(is_markdown) {
            continue;
        }
        let Some(content) = ctx.read_text(&path) else {
            continue;
        };
        let escaped = f(&content);
        if escaped != content {
            ctx.rewrite(&path, &escaped);
        }
    }
}
