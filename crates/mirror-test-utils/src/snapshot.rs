//! Builders for page trees and snapshots.

use std::collections::BTreeMap;

use mirror_meta::page::{count_pages, resolve_file_paths, sort_by_position};
use mirror_meta::{PageMeta, Snapshot, SpaceMeta, SpaceRef};

/// A leaf page with a position derived from `index`.
pub fn page(id: &str, title: &str, index: usize) -> PageMeta {
    PageMeta::new(id, title, format!("a{index:04}"))
}

/// Builds a [`Snapshot`] the way the remote client does: file paths are
/// resolved against the blobs, siblings sorted and pages counted.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    meta: SpaceMeta,
    blobs: BTreeMap<String, Vec<u8>>,
}

impl SnapshotBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            meta: SpaceMeta {
                id: id.into(),
                name: name.into(),
                slug: id.into(),
                ..SpaceMeta::default()
            },
            blobs: BTreeMap::new(),
        }
    }

    pub fn page(mut self, page: PageMeta) -> Self {
        self.meta.pages.push(page);
        self
    }

    pub fn blob(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.blobs.insert(path.into(), content.into());
        self
    }

    pub fn space_ref(&self) -> SpaceRef {
        SpaceRef {
            id: self.meta.id.clone(),
            name: self.meta.name.clone(),
            slug: self.meta.slug.clone(),
        }
    }

    pub fn build(mut self) -> Snapshot {
        sort_by_position(&mut self.meta.pages);
        resolve_file_paths(&mut self.meta.pages, &self.blobs);
        self.meta.total_pages = count_pages(&self.meta.pages);
        Snapshot {
            meta: self.meta,
            blobs: self.blobs,
        }
    }
}
