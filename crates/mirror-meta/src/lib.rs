//! Snapshot model for docmirror.
//!
//! A [`Snapshot`] is one space's export: the page tree and the raw archive
//! blobs keyed by path. The page tree is also persisted next to the
//! published files as `_metadata.json`, which reconciliation reads back.

pub mod document;
pub mod error;
pub mod page;
pub mod snapshot;

pub use document::{METADATA_FILE, load_metadata, save_metadata};
pub use error::{Error, Result};
pub use page::{PageMeta, SpaceMeta};
pub use snapshot::{Snapshot, SpaceRef, safe_blob_path};
