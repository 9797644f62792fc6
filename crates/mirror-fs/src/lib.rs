//! Filesystem primitives for docmirror
//!
//! Everything here operates on real directories: the working tree is the
//! filesystem itself, so merges, prunes and the publish swap are plain
//! renames and removals with careful ordering.

pub mod error;
pub mod io;
pub mod lock;
pub mod publish;
pub mod tree;

pub use error::{Error, Result};
pub use lock::ProcessLock;
pub use publish::{DirOps, PublishSlot, SlotState, StdDirOps};
pub use tree::{MergeSummary, merge_dir};
