//! Shared test utilities for the docmirror workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`checksum`]: digests for comparing trees across runs
//! - [`tree`]: [`TestTree`], a temporary working tree with setup and
//!   assertion helpers
//! - [`snapshot`]: builders for page trees and snapshots

pub mod checksum;
pub mod snapshot;
pub mod tree;

pub use checksum::tree_checksum;
pub use snapshot::{SnapshotBuilder, page};
pub use tree::TestTree;
