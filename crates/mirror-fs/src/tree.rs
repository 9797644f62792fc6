//! Directory tree helpers: ordered walks, merges, copies and pruning.
//!
//! All walks are sorted by file name so every caller sees a deterministic
//! order. "Deepest first" means a directory is yielded after everything it
//! contains, which keeps earlier paths valid while later ones are renamed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::io::entry_exists;
use crate::{Error, Result};

/// What a [`merge_dir`] call did.
#[derive(Debug, Default)]
pub struct MergeSummary {
    /// Entries moved from the source into the destination, as `(from, to)`.
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Source entries dropped because the destination already had that name.
    pub discarded: Vec<PathBuf>,
    /// Entries that could not be moved or removed; the source is kept.
    pub errors: Vec<Error>,
}

impl MergeSummary {
    fn absorb(&mut self, other: MergeSummary) {
        self.moved.extend(other.moved);
        self.discarded.extend(other.discarded);
        self.errors.extend(other.errors);
    }
}

/// Merge directory `src` into directory `dst`, then remove `src`.
///
/// For each entry of `src`:
/// - if `dst` has no entry of that name, the entry is moved;
/// - if both are directories, they are merged recursively;
/// - otherwise the destination wins and the source entry is discarded.
///
/// The discard is silent data loss by policy: a conflicting source file is
/// never renamed aside. Per-entry failures are collected in
/// [`MergeSummary::errors`] and leave `src` in place.
pub fn merge_dir(src: &Path, dst: &Path) -> Result<MergeSummary> {
    if !dst.is_dir() {
        fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;
    }

    let mut summary = MergeSummary::default();
    for entry in sorted_children(src)? {
        let name = match entry.file_name() {
            Some(name) => name.to_owned(),
            None => continue,
        };
        let target = dst.join(&name);

        if !entry_exists(&target) {
            match fs::rename(&entry, &target) {
                Ok(()) => summary.moved.push((entry, target)),
                Err(e) => summary.errors.push(Error::io(&entry, e)),
            }
            continue;
        }

        if entry.is_dir() && target.is_dir() {
            match merge_dir(&entry, &target) {
                Ok(nested) => summary.absorb(nested),
                Err(e) => summary.errors.push(e),
            }
            continue;
        }

        debug!(source = %entry.display(), target = %target.display(), "destination wins, discarding source entry");
        match remove_entry(&entry) {
            Ok(()) => summary.discarded.push(entry),
            Err(e) => summary.errors.push(e),
        }
    }

    if summary.errors.is_empty() {
        fs::remove_dir_all(src).map_err(|e| Error::io(src, e))?;
    }
    Ok(summary)
}

/// Copy every file under `src` into `dst` that `dst` does not already have.
///
/// Existing destination files are never overwritten. Returns the paths
/// created under `dst`.
pub fn copy_missing(src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else if !entry_exists(&target) {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
            copied.push(target);
        }
    }
    Ok(copied)
}

/// Remove every empty directory below `root`, bottom-up, keeping `root`.
///
/// Chains of directories that only contain empty directories collapse
/// completely. Failures are logged and skipped.
pub fn prune_empty_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for dir in dirs_deepest_first(root)? {
        if is_empty_dir(&dir) {
            match fs::remove_dir(&dir) {
                Ok(()) => removed.push(dir),
                Err(e) => warn!(path = %dir.display(), error = %e, "failed to remove empty directory"),
            }
        }
    }
    Ok(removed)
}

/// Remove `start` and then each parent while they are empty, stopping
/// before `stop` (which is never removed).
pub fn prune_empty_ancestors(start: &Path, stop: &Path) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    let mut current = start.to_path_buf();
    while current != stop && current.starts_with(stop) {
        if !is_empty_dir(&current) || fs::remove_dir(&current).is_err() {
            break;
        }
        removed.push(current.clone());
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
    removed
}

/// Every directory below `root`, children before their parents.
pub fn dirs_deepest_first(root: &Path) -> Result<Vec<PathBuf>> {
    collect(root, true, |entry| entry.file_type().is_dir())
}

/// Every directory and file below `root`, children before their parents.
pub fn entries_deepest_first(root: &Path) -> Result<Vec<PathBuf>> {
    collect(root, true, |_| true)
}

/// Every regular file below `root`, in pre-order.
pub fn files(root: &Path) -> Result<Vec<PathBuf>> {
    collect(root, false, |entry| entry.file_type().is_file())
}

/// Every directory below `root`, parents before their children.
pub fn dirs(root: &Path) -> Result<Vec<PathBuf>> {
    collect(root, false, |entry| entry.file_type().is_dir())
}

/// Returns true if `path` is a directory with no entries.
pub fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

fn collect(
    root: &Path,
    contents_first: bool,
    keep: impl Fn(&walkdir::DirEntry) -> bool,
) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(contents_first)
        .sort_by_file_name()
    {
        let entry = entry?;
        if keep(&entry) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(dir, e))?;
    children.sort();
    Ok(children)
}

fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }
}
