//! Tests for tree merge, copy and prune helpers

use mirror_fs::tree::{
    copy_missing, dirs_deepest_first, is_empty_dir, merge_dir, prune_empty_ancestors,
    prune_empty_dirs,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_merge_moves_missing_entries() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/a.md", "A");
    write(dir.path(), "src/sub/b.md", "B");
    fs::create_dir(dir.path().join("dst")).unwrap();

    let summary = merge_dir(&dir.path().join("src"), &dir.path().join("dst")).unwrap();

    assert_eq!(summary.moved.len(), 2);
    assert!(summary.discarded.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("dst/a.md")).unwrap(), "A");
    assert_eq!(fs::read_to_string(dir.path().join("dst/sub/b.md")).unwrap(), "B");
    assert!(!dir.path().join("src").exists());
}

/// Destination wins: a conflicting source file is discarded, not renamed.
#[test]
fn test_merge_destination_wins_on_conflict() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/x.png", "S");
    write(dir.path(), "dst/x.png", "D");

    let summary = merge_dir(&dir.path().join("src"), &dir.path().join("dst")).unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("dst/x.png")).unwrap(), "D");
    assert_eq!(summary.discarded, vec![dir.path().join("src/x.png")]);
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_merge_recurses_into_shared_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/files/new.png", "N");
    write(dir.path(), "src/files/same.png", "S");
    write(dir.path(), "dst/files/same.png", "D");

    merge_dir(&dir.path().join("src"), &dir.path().join("dst")).unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("dst/files/new.png")).unwrap(), "N");
    assert_eq!(fs::read_to_string(dir.path().join("dst/files/same.png")).unwrap(), "D");
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_merge_type_mismatch_keeps_destination() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/thing/inner.md", "dir");
    write(dir.path(), "dst/thing", "file");

    merge_dir(&dir.path().join("src"), &dir.path().join("dst")).unwrap();

    assert!(dir.path().join("dst/thing").is_file());
}

#[test]
fn test_copy_missing_never_overwrites() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/a.png", "new");
    write(dir.path(), "src/deep/b.png", "B");
    write(dir.path(), "dst/a.png", "old");

    let copied = copy_missing(&dir.path().join("src"), &dir.path().join("dst")).unwrap();

    assert_eq!(copied, vec![dir.path().join("dst/deep/b.png")]);
    assert_eq!(fs::read_to_string(dir.path().join("dst/a.png")).unwrap(), "old");
    assert!(dir.path().join("src/a.png").exists());
}

#[test]
fn test_prune_collapses_empty_chains() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
    write(dir.path(), "keep/file.md", "x");

    let removed = prune_empty_dirs(dir.path()).unwrap();

    assert_eq!(removed.len(), 3);
    assert!(!dir.path().join("a").exists());
    assert!(dir.path().join("keep/file.md").exists());
    assert!(dir.path().exists());
}

#[test]
fn test_prune_keeps_empty_root() {
    let dir = tempdir().unwrap();
    assert!(prune_empty_dirs(dir.path()).unwrap().is_empty());
    assert!(is_empty_dir(dir.path()));
}

#[test]
fn test_prune_ancestors_stops_at_root_and_non_empty() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
    write(dir.path(), "a/sibling.md", "x");

    let removed = prune_empty_ancestors(&dir.path().join("a/b/c"), dir.path());

    assert_eq!(removed, vec![dir.path().join("a/b/c"), dir.path().join("a/b")]);
    assert!(dir.path().join("a").exists());
}

#[test]
fn test_deepest_first_orders_children_before_parents() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/b")).unwrap();
    fs::create_dir_all(dir.path().join("c")).unwrap();

    let order = dirs_deepest_first(dir.path()).unwrap();

    assert_eq!(
        order,
        vec![dir.path().join("a/b"), dir.path().join("a"), dir.path().join("c")]
    );
}
