//! SHA-256 digests of whole directory trees
//!
//! Used to compare a tree before and after a run. The digest covers every
//! relative path (with a type marker) and every file's bytes, in sorted
//! order, so it is independent of directory iteration order.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

const PREFIX: &str = "sha256:";

/// Checksum of a byte slice.
pub fn content_checksum(content: &[u8]) -> String {
    format!("{PREFIX}{:x}", Sha256::digest(content))
}

/// Checksum over the layout and content of the tree below `root`.
///
/// The root directory itself is not part of the digest.
pub fn tree_checksum(root: &Path) -> String {
    let mut hasher = Sha256::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.unwrap();
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        if entry.file_type().is_dir() {
            hasher.update(format!("d:{rel}\n"));
        } else {
            let bytes = fs::read(entry.path()).unwrap();
            hasher.update(format!("f:{rel}\n{}\n", content_checksum(&bytes)));
        }
    }
    format!("{PREFIX}{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_known_value() {
        assert_eq!(
            content_checksum(b"hello world"),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn tree_checksum_tracks_content_and_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/x.md"), "one").unwrap();
        let first = tree_checksum(dir.path());
        assert_eq!(first, tree_checksum(dir.path()));

        fs::write(dir.path().join("a/x.md"), "two").unwrap();
        let second = tree_checksum(dir.path());
        assert_ne!(first, second);

        fs::rename(dir.path().join("a/x.md"), dir.path().join("a/y.md")).unwrap();
        assert_ne!(second, tree_checksum(dir.path()));
    }
}
