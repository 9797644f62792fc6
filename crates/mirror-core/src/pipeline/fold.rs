//! Folds: file-and-directory pairs and locale directory pairs.

use mirror_fs::io::entry_exists;
use mirror_fs::tree;
use mirror_translit::{contains_hangul, transliterate_name};

use super::context::{PassContext, name_of};

const ATTACHMENTS_DIR: &str = "files";

/// Move `X.md` into a sibling directory `X` as `X/X.md`.
///
/// The attachment directory next to `X.md` is copied into `X/files` first
/// (without overwriting) so relative links keep resolving.
pub(crate) fn fold_same_name(ctx: &mut PassContext<'_>) {
    let dirs = ctx.listing(tree::dirs(ctx.root));
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let (Some(name), Some(parent)) = (name_of(&dir), dir.parent()) else {
            continue;
        };
        let document = format!("{name}.md");
        let sibling = parent.join(&document);
        if !sibling.is_file() {
            continue;
        }
        let inner = dir.join(&document);
        if entry_exists(&inner) {
            ctx.warn(format!(
                "{} already exists, leaving {} beside it",
                ctx.rel(&inner).display(),
                ctx.rel(&sibling).display()
            ));
            continue;
        }

        let attachments = parent.join(ATTACHMENTS_DIR);
        if attachments.is_dir() && attachments != dir {
            ctx.copy_attachments(&attachments, &dir.join(ATTACHMENTS_DIR));
        }
        ctx.move_into(&sibling, &inner);
    }
}

/// Fold original-script directories into their transliterated spelling.
///
/// Directories are visited deepest first. When the transliterated sibling
/// exists the two are merged (destination wins). With `rename_orphans`,
/// directories without such a sibling are renamed to it.
pub(crate) fn fold_locale_dirs(ctx: &mut PassContext<'_>, rename_orphans: bool) {
    let dirs = ctx.listing(tree::dirs_deepest_first(ctx.root));
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let (Some(name), Some(parent)) = (name_of(&dir), dir.parent()) else {
            continue;
        };
        if !contains_hangul(name) {
            continue;
        }
        let target_name = transliterate_name(name);
        if target_name.is_empty() || target_name == name {
            continue;
        }
        let target = parent.join(&target_name);

        if target.is_dir() {
            ctx.merge(&dir, &target);
        } else if !rename_orphans {
            continue;
        } else if entry_exists(&target) {
            ctx.warn(format!(
                "{} exists and is not a directory, leaving {}",
                ctx.rel(&target).display(),
                ctx.rel(&dir).display()
            ));
        } else {
            ctx.rename(&dir, &target);
        }
    }
}
