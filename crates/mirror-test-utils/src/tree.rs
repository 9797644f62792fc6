//! [`TestTree`]: a temporary directory laid out like an exported space.

use std::fs;
use std::path::{Path, PathBuf};

use mirror_meta::{PageMeta, SpaceMeta, save_metadata};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A temporary working tree with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.file("A/B.md", "X");
/// tree.assert_file("A/B.md", "X");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestTree::new: failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    pub fn dir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.path(rel)).unwrap();
        self
    }

    /// Write `_metadata.json` for the given root pages.
    pub fn metadata(&self, pages: Vec<PageMeta>) -> &Self {
        let meta = SpaceMeta {
            id: "space".into(),
            name: "Space".into(),
            total_pages: mirror_meta::page::count_pages(&pages),
            pages,
            ..SpaceMeta::default()
        };
        save_metadata(self.root(), &meta).unwrap();
        self
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("cannot read {rel}: {e}\ntree:\n{}", self.listing().join("\n")))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// Every entry below the root as a sorted relative path; directories
    /// end in `/`.
    pub fn listing(&self) -> Vec<String> {
        let mut out: Vec<String> = WalkDir::new(self.root())
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .map(|entry| {
                let rel = entry
                    .path()
                    .strip_prefix(self.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                if entry.file_type().is_dir() {
                    format!("{rel}/")
                } else {
                    rel
                }
            })
            .collect();
        out.sort();
        out
    }

    /// Like [`listing`](Self::listing) without `_metadata.json`.
    pub fn documents(&self) -> Vec<String> {
        self.listing()
            .into_iter()
            .filter(|p| p != mirror_meta::METADATA_FILE)
            .collect()
    }

    pub fn assert_file(&self, rel: &str, expected: &str) {
        assert_eq!(self.read(rel), expected, "content of {rel}");
    }

    pub fn assert_exists(&self, rel: &str) {
        assert!(
            self.exists(rel),
            "expected {rel} to exist\ntree:\n{}",
            self.listing().join("\n")
        );
    }

    pub fn assert_missing(&self, rel: &str) {
        assert!(
            !self.exists(rel),
            "expected {rel} to be gone\ntree:\n{}",
            self.listing().join("\n")
        );
    }
}
