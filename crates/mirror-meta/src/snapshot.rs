//! One space's export, as handed from the remote source to the engine.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::SpaceMeta;

/// Identity of a space as listed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// The page tree and raw blobs of one export.
///
/// Built once per run and consumed when the working tree is populated.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub meta: SpaceMeta,
    pub blobs: BTreeMap<String, Vec<u8>>,
}

impl Snapshot {
    pub fn space_id(&self) -> &str {
        &self.meta.id
    }

    pub fn space_name(&self) -> &str {
        &self.meta.name
    }

    pub fn total_pages(&self) -> usize {
        self.meta.total_pages
    }
}

/// Convert an archive key into a relative path that stays inside the tree.
///
/// Returns `None` for empty, absolute or parent-escaping keys.
pub fn safe_blob_path(key: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(key).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}
