//! The seam between the engine and wherever snapshots come from.

use async_trait::async_trait;
use mirror_meta::{Snapshot, SpaceRef};

use crate::Result;

/// Produces the spaces to mirror and one snapshot per space.
///
/// Implementations report failures as [`crate::Error::Retrieval`]. A failed
/// `list_spaces` fails the run; a failed `fetch_snapshot` fails only that
/// space.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn list_spaces(&self) -> Result<Vec<SpaceRef>>;

    async fn fetch_snapshot(&self, space: &SpaceRef) -> Result<Snapshot>;
}
