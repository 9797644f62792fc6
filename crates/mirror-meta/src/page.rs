//! Page tree types and traversal helpers.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use mirror_translit::{page_file_stem, split_markdown};
use serde::{Deserialize, Serialize};

/// One space's metadata document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub pages: Vec<PageMeta>,
}

/// One node of the page tree.
///
/// `has_children` comes from the remote service and may be true while
/// `children` is empty (children that could not be fetched).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub id: String,
    #[serde(default)]
    pub slug_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_page_id: Option<String>,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl PageMeta {
    pub fn new(id: impl Into<String>, title: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position: position.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<PageMeta>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.parent_page_id = Some(self.id.clone());
                child
            })
            .collect();
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

impl SpaceMeta {
    /// Every page in the tree, parents before children.
    pub fn all_pages(&self) -> Vec<&PageMeta> {
        let mut out = Vec::new();
        collect(&self.pages, &mut out);
        out
    }

    /// Titles containing a path separator, in tree order.
    pub fn slash_titles(&self) -> Vec<&str> {
        self.all_pages()
            .into_iter()
            .map(|page| page.title.as_str())
            .filter(|title| title.contains('/'))
            .collect()
    }
}

fn collect<'a>(pages: &'a [PageMeta], out: &mut Vec<&'a PageMeta>) {
    for page in pages {
        out.push(page);
        collect(&page.children, out);
    }
}

/// Number of nodes in a forest.
pub fn count_pages(pages: &[PageMeta]) -> usize {
    pages
        .iter()
        .map(|page| 1 + count_pages(&page.children))
        .sum()
}

/// Order every sibling list by `position`, recursively.
pub fn sort_by_position(pages: &mut [PageMeta]) {
    pages.sort_by(|a, b| a.position.cmp(&b.position));
    for page in pages {
        sort_by_position(&mut page.children);
    }
}

/// Assemble a tree from root pages and a parent id to children map.
///
/// Children are attached by id; pages never reached stay in the map and are
/// dropped. Cycles cannot occur because each id is taken out of the map
/// once.
pub fn assemble_tree(
    roots: Vec<PageMeta>,
    children: &mut HashMap<String, Vec<PageMeta>>,
) -> Vec<PageMeta> {
    roots
        .into_iter()
        .map(|mut page| {
            if let Some(kids) = children.remove(&page.id) {
                page.children = assemble_tree(kids, children);
            }
            page
        })
        .collect()
}

/// Fill `file_path` for every page whose exported document can be found.
///
/// A blob matches when it is a document whose stem equals the title's
/// filename-safe form or the raw title. Blob keys are searched in sorted
/// order so the first match is stable.
pub fn resolve_file_paths(pages: &mut [PageMeta], blobs: &BTreeMap<String, Vec<u8>>) {
    for page in pages {
        page.file_path = find_document(&page.title, blobs);
        resolve_file_paths(&mut page.children, blobs);
    }
}

fn find_document(title: &str, blobs: &BTreeMap<String, Vec<u8>>) -> Option<String> {
    let safe = page_file_stem(title);
    blobs.keys().find_map(|key| {
        let name = key.rsplit('/').next().unwrap_or(key);
        let (stem, _) = split_markdown(name)?;
        (stem == safe || stem == title).then(|| key.clone())
    })
}
